mod catalog_service;

pub use catalog_service::{
    SettingsLookup, get_article_details, get_library_settings, list_articles,
};
