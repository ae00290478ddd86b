mod audit;
mod rental_service;

pub use audit::{StatusMismatch, audit_article_statuses};
pub use rental_service::{
    RentalReceipt, RentedArticle, list_rented_articles, rent_article, return_article,
};
