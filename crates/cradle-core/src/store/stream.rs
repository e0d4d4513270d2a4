// ── Status snapshot stream ──

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use cradle_api::AgentStatus;
use futures_core::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// `Stream` of status snapshots for the selected cradle.
///
/// Yields the current value first, then one item per replacement. `None`
/// means no snapshot is held (nothing selected, or the selection changed
/// and the first poll for the new cradle has not landed yet).
pub struct StatusStream {
    inner: WatchStream<Option<Arc<AgentStatus>>>,
}

impl StatusStream {
    pub(crate) fn new(receiver: watch::Receiver<Option<Arc<AgentStatus>>>) -> Self {
        Self {
            inner: WatchStream::new(receiver),
        }
    }
}

impl Stream for StatusStream {
    type Item = Option<Arc<AgentStatus>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}
