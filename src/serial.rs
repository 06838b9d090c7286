//! Serial console logging.
//!
//! The board installs whatever implements [`core::fmt::Write`] for its debug
//! UART; until then every `serial_print!` is discarded.

use core::fmt::{self, Write};
use spin::Mutex;

/// A console the macros can write to.
pub type SerialSink = &'static mut (dyn Write + Send);

static SERIAL: Mutex<Option<SerialSink>> = Mutex::new(None);

/// Route log output to `sink`, returning the previously installed one.
pub fn install(sink: SerialSink) -> Option<SerialSink> {
    SERIAL.lock().replace(sink)
}

/// Stop logging and hand the sink back.
pub fn uninstall() -> Option<SerialSink> {
    SERIAL.lock().take()
}

pub fn is_installed() -> bool {
    SERIAL.lock().is_some()
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    if let Some(sink) = SERIAL.lock().as_mut() {
        // a console that refuses a write has nowhere to report it
        let _ = sink.write_fmt(args);
    }
}

/// Prints to the installed serial console.
#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => {
        $crate::serial::_print(format_args!($($arg)*))
    };
}

/// Prints to the installed serial console, appending a newline.
#[macro_export]
macro_rules! serial_println {
    () => ($crate::serial_print!("\n"));
    ($fmt:expr) => ($crate::serial_print!(concat!($fmt, "\n")));
    ($fmt:expr, $($arg:tt)*) => ($crate::serial_print!(
        concat!($fmt, "\n"), $($arg)*));
}
