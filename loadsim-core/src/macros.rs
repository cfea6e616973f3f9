#[macro_export]
/// Generates a String similar to output of `dbg` but without printing
macro_rules! format_dbg {
    ($dbg_expr:expr) => {
        format!(
            "[{}:{}] {}: {:?}",
            file!(),
            line!(),
            stringify!($dbg_expr),
            $dbg_expr
        )
    };
    () => {
        format!("[{}:{}]", file!(), line!())
    };
}

#[macro_export]
/// Emits a `log` record when the `logging` feature is enabled and expands to
/// nothing otherwise, e.g. `log_if_enabled!(warn, "{}", msg)`
macro_rules! log_if_enabled {
    ($level:ident, $($arg:tt)+) => {
        #[cfg(feature = "logging")]
        {
            log::$level!($($arg)+);
        }
    };
}

#[macro_export]
/// Checks that every listed field of a parameter record is strictly positive
macro_rules! ensure_positive {
    ($struct_self:ident, $($field:ident),+ $(,)?) => {
        $(
            anyhow::ensure!(
                $struct_self.$field > 0.0,
                "{}\n`{}` must be > 0",
                format_dbg!($struct_self.$field),
                stringify!($field)
            );
        )+
    };
}
