mod controls;
mod details;
mod files;
mod fps;
mod panels;
