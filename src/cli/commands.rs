pub mod course;
pub mod initdb;
pub mod shell;
pub mod student;

pub use course::course_command;
pub use initdb::init_database;
pub use shell::shell;
pub use student::student_command;
