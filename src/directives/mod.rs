mod ask;
mod choice;
mod end;
mod say;

pub use ask::Ask;
pub use choice::Choice;
pub use end::End;
pub use say::Say;
