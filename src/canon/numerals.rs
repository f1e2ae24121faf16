/// Render a number as a Hebrew numeral (gematria), e.g. `21` → `כ״א`.
///
/// Single letters get a geresh (`א׳`), multi-letter numerals get gershayim
/// before the last letter. 15 and 16 are written ט״ו and ט״ז to avoid spelling
/// the divine name. Numbers of 1000 and above fall back to Arabic digits.
pub fn hebrew_numeral(num: u32) -> String {
    const ONES: [&str; 10] = ["", "א", "ב", "ג", "ד", "ה", "ו", "ז", "ח", "ט"];
    const TENS: [&str; 10] = ["", "י", "כ", "ל", "מ", "נ", "ס", "ע", "פ", "צ"];
    const HUNDREDS: [&str; 5] = ["", "ק", "ר", "ש", "ת"];

    if num == 0 || num >= 1000 {
        return num.to_string();
    }

    let mut letters = String::new();
    let mut rest = num;

    // 500-900 stack tav with the remaining hundreds
    while rest >= 400 {
        letters.push_str(HUNDREDS[4]);
        rest -= 400;
    }
    if rest >= 100 {
        letters.push_str(HUNDREDS[(rest / 100) as usize]);
        rest %= 100;
    }
    match rest {
        15 => letters.push_str("טו"),
        16 => letters.push_str("טז"),
        _ => {
            letters.push_str(TENS[(rest / 10) as usize]);
            letters.push_str(ONES[(rest % 10) as usize]);
        }
    }

    let mut chars: Vec<char> = letters.chars().collect();
    if chars.len() == 1 {
        chars.push('׳');
    } else {
        chars.insert(chars.len() - 1, '״');
    }
    chars.into_iter().collect()
}
