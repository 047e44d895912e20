//! Terminal loading indicator bound to a page's loading flag.

use std::io::Write;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Braille spinner frames.
const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Frame interval.
const INTERVAL: Duration = Duration::from_millis(80);

/// Draws a spinner on stderr whenever the followed flag is `true`.
///
/// The flag is owned by the page; the spinner only watches it. Dropping the
/// sender (page gone) or calling [`Spinner::stop`] ends the task.
pub struct Spinner {
    handle: JoinHandle<()>,
    cancel: watch::Sender<bool>,
}

impl Spinner {
    /// Follow `loading`, showing `message` next to the spinner while it is set.
    pub fn follow(mut loading: watch::Receiver<bool>, message: &str) -> Self {
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let message = message.to_string();

        let handle = tokio::spawn(async move {
            let mut i = 0;
            let mut drawn = false;
            loop {
                if *loading.borrow_and_update() {
                    let frame = FRAMES[i % FRAMES.len()];
                    // \r moves to start of line, \x1b[2K clears the line
                    eprint!("\x1b[2K\r{frame} {message}");
                    let _ = std::io::stderr().flush();
                    drawn = true;
                    i += 1;

                    tokio::select! {
                        _ = tokio::time::sleep(INTERVAL) => {}
                        changed = loading.changed() => if changed.is_err() { break },
                        _ = cancel_rx.changed() => break,
                    }
                } else {
                    if drawn {
                        eprint!("\x1b[2K\r");
                        let _ = std::io::stderr().flush();
                        drawn = false;
                    }
                    tokio::select! {
                        changed = loading.changed() => if changed.is_err() { break },
                        _ = cancel_rx.changed() => break,
                    }
                }
            }
            if drawn {
                eprint!("\x1b[2K\r");
                let _ = std::io::stderr().flush();
            }
        });

        Self {
            handle,
            cancel: cancel_tx,
        }
    }

    /// Stop following and clear the spinner line.
    pub async fn stop(self) {
        let _ = self.cancel.send(true);
        let _ = self.handle.await;
    }
}
