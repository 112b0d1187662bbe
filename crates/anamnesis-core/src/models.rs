pub mod answer;
pub mod insight;
pub mod question;
pub mod selection;
pub mod template;
