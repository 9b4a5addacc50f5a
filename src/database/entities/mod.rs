pub mod users;
pub mod vcells;
pub mod vcolumns;
pub mod vrows;
pub mod vtables;
