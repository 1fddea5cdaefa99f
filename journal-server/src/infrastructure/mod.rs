pub(crate) mod jwt;
pub(crate) mod logging;
pub(crate) mod settings;
