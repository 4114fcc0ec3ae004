pub mod playlist;
pub mod shortcut;
pub mod show;
pub mod show_list;
