mod commands;
mod dispatcher;
mod history;
mod params;

pub use commands::{
    COMMANDS, CommandDescriptor, CommandId, Menu, TransformContext, TransformFn, descriptor, in_menu,
};
pub use dispatcher::{DispatchOutcome, Dispatcher, SkipReason};
pub use history::{EditHistory, HistoryError};
pub use params::{Param, ParamPrompt, parse_ints, parse_size, parse_uints};
