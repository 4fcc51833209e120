mod bootstrap;
mod loop_runner;
mod scene_def;

pub(crate) use bootstrap::build_app;
pub(crate) use loop_runner::run;
