use crate::configuration::Config;
use crate::configuration::ConfigKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Author {
    User,
    Sahayak,
}

impl ToString for Author {
    fn to_string(&self) -> String {
        match self {
            Author::User => return Config::get(ConfigKey::Username),
            Author::Sahayak => return String::from("Sahayak"),
        }
    }
}
