pub mod catalog;
pub mod debounce;
pub mod images;
pub mod menu;
pub mod profile;
pub mod remote;
pub mod session;
pub mod sync;
