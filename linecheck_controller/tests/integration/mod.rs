mod error_lock;
mod record_log;
mod startup;
