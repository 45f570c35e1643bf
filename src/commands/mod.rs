pub type CmdResult<T> = linesub::Result<(T, i32)>;

pub(crate) struct GlobalArgs {}

pub mod replace;

/// Dispatch a command to its handler and map result to JSON.
macro_rules! dispatch {
    ($args:expr, $global:expr, $module:ident) => {
        crate::output::map_cmd_result_to_json($module::run($args, $global))
    };
}

pub(crate) fn run_json(
    command: crate::Commands,
    global: &GlobalArgs,
) -> (linesub::Result<serde_json::Value>, i32) {
    match command {
        crate::Commands::Replace(args) => dispatch!(args, global, replace),
    }
}
