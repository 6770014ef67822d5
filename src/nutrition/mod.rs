pub mod local_table;
