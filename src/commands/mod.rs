pub(crate) mod app_vars;
pub(crate) mod new;
pub(crate) mod short_name;
