pub mod audit;
pub mod catalog;
pub mod report;

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
     _ _                   _ _ _
 ___(_) |_ ___  __ _ _   _  __| (_) |_
/ __| | __/ _ \/ _` | | | |/ _` | | __|
\__ \ | ||  __/ (_| | |_| | (_| | | |_
|___/_|\__\___|\__,_|\__,_|\__,_|_|\__|
"#;
    eprintln!("{}", banner.bright_cyan().bold());
    eprintln!(
        "  {} {}\n",
        "on-page SEO audit".bright_white(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
}
