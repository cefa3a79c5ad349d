//! URL-safe slugs for trail and spot names.

/// Turn a display name into a lowercase, dash-separated slug.
///
/// ASCII letters and digits are kept, common Latin accents are folded to
/// their base letter, and every other run of characters becomes one `-`.
pub fn create_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let folded = if c.is_ascii_alphanumeric() {
            None
        } else {
            match fold_accent(c) {
                Some(base) => Some(base),
                None => {
                    pending_dash = true;
                    continue;
                }
            }
        };

        if pending_dash && !slug.is_empty() {
            slug.push('-');
        }
        pending_dash = false;

        match folded {
            Some(base) => slug.push_str(base),
            None => slug.push(c),
        }
    }

    slug
}

fn fold_accent(c: char) -> Option<&'static str> {
    let base = match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' => "a",
        'æ' => "ae",
        'ç' | 'č' | 'ć' => "c",
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ę' => "e",
        'ì' | 'í' | 'î' | 'ï' | 'ī' => "i",
        'ñ' | 'ń' => "n",
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' => "o",
        'œ' => "oe",
        'ß' => "ss",
        'š' | 'ś' => "s",
        'ù' | 'ú' | 'û' | 'ü' | 'ū' => "u",
        'ý' | 'ÿ' => "y",
        'ž' | 'ź' | 'ż' => "z",
        'ł' => "l",
        _ => return None,
    };
    Some(base)
}
