pub(crate) mod page;
pub(crate) mod show;
pub(crate) mod sign;
