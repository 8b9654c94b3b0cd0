pub mod category;
pub mod edition;
pub mod edition_website;
pub mod website;

pub use category::Entity as Category;
pub use edition::Entity as Edition;
pub use edition_website::Entity as EditionWebsite;
pub use website::Entity as Website;
