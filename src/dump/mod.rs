// ABOUTME: Dump script production and replay
// ABOUTME: Export orchestration, per-table sections, import engine and maintenance

pub mod export;
pub mod import;
pub mod maintenance;
pub mod result;
pub mod table;

pub use export::{export, export_with};
pub use import::{import, import_from_reader, ImportMode, StatementAssembler};
pub use maintenance::{optimize, repair, OptimizeOptions, RepairOptions};
pub use result::ImportResult;
pub use table::{MysqlTableExporter, Table, TableExporter};
