//! User agent generation

use rand::seq::SliceRandom;

const CHROME_VERSIONS: [&str; 4] = ["141.0.0.0", "142.0.0.0", "143.0.0.0", "144.0.0.0"];

const OS_STRINGS: [&str; 4] = [
    "Windows NT 10.0; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "X11; Linux x86_64",
    "Windows NT 10.0; WOW64",
];

/// Generate a random but realistic desktop Chrome user agent string
pub fn generate_user_agent() -> String {
    let mut rng = rand::thread_rng();

    let os = OS_STRINGS.choose(&mut rng).copied().unwrap_or(OS_STRINGS[0]);
    let chrome = CHROME_VERSIONS
        .choose(&mut rng)
        .copied()
        .unwrap_or(CHROME_VERSIONS[0]);

    format!(
        "Mozilla/5.0 ({}) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/{} Safari/537.36",
        os, chrome
    )
}

/// Standard accept header for JSON APIs
pub fn accept_json() -> &'static str {
    "application/json, text/javascript, */*; q=0.01"
}
