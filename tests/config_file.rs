use std::path::Path;

use apahukum::models::Config;

#[test]
fn test_shipped_config_is_valid() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/config.toml");
    let config = Config::load(&path).unwrap();
    config.validate().unwrap();

    assert_eq!(config.source.category, "Irsyad Hukum - Umum");
    assert_eq!(config.bot.chunk_limit(), 3896);
    assert_eq!(config.schedule.hour, 3);
    assert!(
        config
            .source
            .listing_url()
            .unwrap()
            .starts_with("https://www.muftiwp.gov.my/ms/artikel/irsyad-hukum/umum")
    );
}
