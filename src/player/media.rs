//! Media resource interface.
//!
//! A media resource is the stateful audio output the controller drives:
//! it takes a source, starts asynchronously, and reports progress through
//! subscriptions. Events are delivered over a channel and carry the binding
//! generation of the subscription that produced them, so the consumer can
//! tell a late event from a superseded source apart from a live one.

use crossbeam_channel::Sender;
use futures::future::BoxFuture;

/// Identifies one binding of the resource to a song.
pub type Generation = u64;

/// Something the resource reports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEventKind {
    /// Periodic position update
    Progress { current_time: f64, duration: f64 },
    /// Source length became known
    MetadataReady { duration: f64 },
    /// Source played to its end
    Ended,
}

/// An event tagged with the generation it was subscribed under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaEvent {
    pub generation: Generation,
    pub kind: MediaEventKind,
}

/// Delivery end of one subscription.
#[derive(Debug, Clone)]
pub struct EventSink {
    generation: Generation,
    tx: Sender<MediaEvent>,
}

impl EventSink {
    pub fn new(generation: Generation, tx: Sender<MediaEvent>) -> Self {
        Self { generation, tx }
    }

    /// Deliver an event. Returns false once the receiver is gone.
    pub fn emit(&self, kind: MediaEventKind) -> bool {
        self.tx
            .send(MediaEvent {
                generation: self.generation,
                kind,
            })
            .is_ok()
    }
}

/// Handle returned by [`MediaResource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Media resource errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MediaError {
    #[error("No source loaded")]
    NoSource,

    #[error("Playback rejected: {0}")]
    Rejected(String),

    #[error("Start interrupted by a source change or pause")]
    Interrupted,
}

/// The audio output primitive driven by the playback controller.
pub trait MediaResource {
    /// Load a source, or unload with `None`.
    fn set_source(&mut self, url: Option<&str>);

    /// Request playback of the loaded source. Resolves once output started.
    fn play(&mut self) -> BoxFuture<'static, Result<(), MediaError>>;

    fn pause(&mut self);

    /// Position in seconds.
    fn current_time(&self) -> f64;

    /// Move the position. The resource clamps out-of-range values itself.
    fn set_current_time(&mut self, seconds: f64);

    fn volume(&self) -> f32;

    fn set_volume(&mut self, volume: f32);

    /// Start delivering events to `sink`.
    fn subscribe(&mut self, sink: EventSink) -> SubscriptionId;

    /// Stop delivering events for `id`. Unknown ids are ignored.
    fn unsubscribe(&mut self, id: SubscriptionId);
}
