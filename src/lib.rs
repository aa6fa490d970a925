pub mod anim;
pub mod avatar;
pub mod camera;
pub mod interaction;
pub mod portfolio;
pub mod ron;
pub mod ui;

pub mod settings;
pub mod debug;
