mod allocator;
mod app;
mod ui;

use std::process::ExitCode;

use crate::app::App;

fn main() -> anyhow::Result<ExitCode> {
    App::init()?.execute()
}
