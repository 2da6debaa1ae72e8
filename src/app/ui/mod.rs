pub(super) mod controls;
pub(super) mod details;
