//! Startup banner and farewell line.

use crate::config::Settings;
use crate::consts::{AUTHOR, HOMEPAGE, REPO};

/// Session configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub settings: &'a Settings,
    pub database: &'a str,
    pub store_auth: bool,
}

/// Build the startup banner with session info.
pub fn banner(info: &BannerInfo) -> String {
    let s = info.settings;
    format!(
        r#"
   ╔═══════════════════════════════════════╗
   ║          J A L R A K S H A K          ║
   ║     water network monitoring shell    ║
   ╚═══════════════════════════════════════╝

   version    {}
   by         {}
   home       {}
   repo       {}
   store      {}{}
   database   {}
   leak       {}
   pilferage  {}
   quality    {}
   theme      {} ({})

   type /help for pages, /quit to leave
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        s.store_url,
        if info.store_auth { " (token)" } else { "" },
        info.database,
        s.leakage_endpoint,
        s.pilferage_endpoint,
        s.quality_endpoint,
        s.theme.color,
        s.theme.mode,
    )
}

pub fn print_banner(info: &BannerInfo) {
    println!("{}", banner(info));
}

pub fn print_goodbye() {
    println!("goodbye.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn banner_lists_endpoints_and_theme() {
        let settings = Settings::default();
        let text = banner(&BannerInfo {
            settings: &settings,
            database: "ephemeral",
            store_auth: false,
        });
        assert!(text.contains("J A L R A K S H A K"));
        assert!(text.contains("http://localhost:8000/predict"));
        assert!(text.contains("http://localhost:5000/pilferage"));
        assert!(text.contains("http://127.0.0.1:5200/predict"));
        assert!(text.contains("#03C9D7 (light)"));
        assert!(!text.contains("(token)"));
    }

    #[test]
    fn banner_marks_store_token() {
        let settings = Settings::default();
        let text = banner(&BannerInfo {
            settings: &settings,
            database: "ephemeral",
            store_auth: true,
        });
        assert!(text.contains("firebaseio.com (token)"));
    }
}
