//! Backend-for-frontend: the directory UI's state, view model and HTML.
//!
//! [`state`] owns everything the UI knows; [`view::render`] turns it into a
//! [`view::PageView`]; [`html::render_page`] and the CLI are hosts over that.

pub mod filter;
pub mod html;
pub mod state;
pub mod tree;
pub mod view;

pub use filter::{EmployeeFilter, filter_employees};
pub use state::{DirectoryState, Event, LoadPhase, RequestTicket, Toast, ToastKind};
pub use tree::{TreeNode, build_tree};
pub use view::{PageView, TableView, render};
