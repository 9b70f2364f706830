//! Clock-driven media resource.
//!
//! [`SimulatedMedia`] stands in for real audio output: it tracks a source,
//! a position and a playing flag, and advances the position when its clock
//! ticks. Source lengths come from a resolver, typically built from the
//! library with [`SimulatedMedia::for_songs`]; a source the resolver does not
//! know is loaded but refuses to play.

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::media::{EventSink, MediaError, MediaEventKind, MediaResource, SubscriptionId};
use crate::model::Song;

type DurationResolver = Arc<dyn Fn(&str) -> Option<f64> + Send + Sync>;

#[derive(Default)]
struct Transport {
    source: Option<String>,
    /// Bumped on every source change and pause; pending starts compare it
    epoch: u64,
    playing: bool,
    position: f64,
    duration: Option<f64>,
    volume: f32,
    subscribers: Vec<(SubscriptionId, EventSink)>,
    next_subscription: u64,
}

impl Transport {
    fn emit(&self, kind: MediaEventKind) {
        for (_, sink) in &self.subscribers {
            sink.emit(kind);
        }
    }
}

/// Shared handle to a simulated transport. Clones address the same transport.
#[derive(Clone)]
pub struct SimulatedMedia {
    inner: Arc<Mutex<Transport>>,
    resolver: DurationResolver,
    start_latency: Duration,
}

impl SimulatedMedia {
    pub fn new(resolver: impl Fn(&str) -> Option<f64> + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Transport {
                volume: 1.0,
                ..Default::default()
            })),
            resolver: Arc::new(resolver),
            start_latency: Duration::ZERO,
        }
    }

    /// Resolve source lengths from the songs' audio urls.
    pub fn for_songs(songs: &[Song]) -> Self {
        let lengths: HashMap<String, f64> = songs
            .iter()
            .filter_map(|song| {
                song.audio_url
                    .as_ref()
                    .map(|url| (url.clone(), f64::from(song.duration)))
            })
            .collect();
        Self::new(move |url| lengths.get(url).copied())
    }

    /// Delay between a start request and output starting.
    pub fn with_start_latency(mut self, latency: Duration) -> Self {
        self.start_latency = latency;
        self
    }

    pub fn is_playing(&self) -> bool {
        self.inner.lock().playing
    }

    pub fn source(&self) -> Option<String> {
        self.inner.lock().source.clone()
    }

    /// Move the clock forward by `seconds` of playback.
    ///
    /// Emits a progress event, followed by an end event when the source
    /// runs out. Does nothing while paused or without a source.
    pub fn advance(&self, seconds: f64) {
        let mut transport = self.inner.lock();
        if !transport.playing || transport.source.is_none() {
            return;
        }

        transport.position += seconds;
        let known = transport.duration;
        match known {
            Some(length) if transport.position >= length => {
                transport.position = length;
                transport.playing = false;
                transport.emit(MediaEventKind::Progress {
                    current_time: length,
                    duration: length,
                });
                tracing::debug!(source = ?transport.source, "Source ended");
                transport.emit(MediaEventKind::Ended);
            }
            _ => {
                let current_time = transport.position;
                transport.emit(MediaEventKind::Progress {
                    current_time,
                    duration: known.unwrap_or(0.0),
                });
            }
        }
    }

    /// Run the clock on the current tokio runtime, advancing by
    /// `tick * speed` each tick until the task is aborted.
    pub fn start_clock(&self, tick: Duration, speed: f64) -> tokio::task::JoinHandle<()> {
        let media = self.clone();
        let step = tick.as_secs_f64() * speed;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                media.advance(step);
            }
        })
    }
}

impl MediaResource for SimulatedMedia {
    fn set_source(&mut self, url: Option<&str>) {
        let duration = url.and_then(|u| (self.resolver)(u));
        let mut transport = self.inner.lock();
        transport.source = url.map(str::to_string);
        transport.epoch += 1;
        transport.playing = false;
        transport.position = 0.0;
        transport.duration = duration;
        if let Some(duration) = duration {
            transport.emit(MediaEventKind::MetadataReady { duration });
        }
    }

    fn play(&mut self) -> BoxFuture<'static, Result<(), MediaError>> {
        let epoch = {
            let transport = self.inner.lock();
            let Some(source) = &transport.source else {
                return futures::future::ready(Err(MediaError::NoSource)).boxed();
            };
            if transport.duration.is_none() {
                let err = MediaError::Rejected(format!("unsupported source {}", source));
                return futures::future::ready(Err(err)).boxed();
            }
            transport.epoch
        };

        let inner = Arc::clone(&self.inner);
        let latency = self.start_latency;
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            let mut transport = inner.lock();
            if transport.epoch != epoch {
                return Err(MediaError::Interrupted);
            }
            // Playing again after the end restarts the source
            if transport
                .duration
                .is_some_and(|length| transport.position >= length)
            {
                transport.position = 0.0;
            }
            transport.playing = true;
            Ok(())
        }
        .boxed()
    }

    fn pause(&mut self) {
        let mut transport = self.inner.lock();
        transport.playing = false;
        transport.epoch += 1;
    }

    fn current_time(&self) -> f64 {
        self.inner.lock().position
    }

    fn set_current_time(&mut self, seconds: f64) {
        let mut transport = self.inner.lock();
        let upper = transport.duration.unwrap_or(f64::MAX);
        transport.position = if seconds.is_nan() {
            0.0
        } else {
            seconds.clamp(0.0, upper)
        };
    }

    fn volume(&self) -> f32 {
        self.inner.lock().volume
    }

    fn set_volume(&mut self, volume: f32) {
        self.inner.lock().volume = volume.clamp(0.0, 1.0);
    }

    fn subscribe(&mut self, sink: EventSink) -> SubscriptionId {
        let mut transport = self.inner.lock();
        transport.next_subscription += 1;
        let id = SubscriptionId(transport.next_subscription);
        transport.subscribers.push((id, sink));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.inner.lock().subscribers.retain(|(sub, _)| *sub != id);
    }
}
