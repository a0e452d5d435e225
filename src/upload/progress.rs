/// Receives the fraction (0.0..=1.0) of the request body handed to the transport.
///
/// Purely informational; nothing waits on it.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, fraction: f32);
}

impl<F> ProgressObserver for F
where
    F: Fn(f32) + Send + Sync,
{
    fn on_progress(&self, fraction: f32) {
        self(fraction)
    }
}

pub(crate) fn fraction(sent: u64, total: u64) -> f32 {
    if total == 0 {
        1.0
    } else {
        (sent as f32 / total as f32).min(1.0)
    }
}
