//! Autoplay policy for observed videos
//!
//! The controller is a plain state machine. The browser layer feeds it
//! visibility changes, play outcomes, fired retry timers and `ended` events,
//! and carries out the [`VideoCommand`]s it returns.
//!
//! Every visibility change bumps the video's generation. Play outcomes and
//! retry timers carry the generation they were issued under, so work started
//! before the video left the viewport can never restart it afterwards.

use crate::error::FxError;
use crate::settings::RetryPolicy;

pub type VideoId = usize;

/// Side effect requested for one video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoCommand {
    /// Remove controls; force muted, inline and eager preload
    Prepare,
    /// Call `play()` and report the outcome with this generation
    Play { generation: u32 },
    /// Seek to the beginning, then play
    Restart { generation: u32 },
    Pause,
    /// Report `on_retry_due` after `delay_ms`
    ScheduleRetry { delay_ms: u32, generation: u32 },
    /// Drop the pending retry timer
    CancelRetry,
    /// Toggle the pause/play icon pair next to the video
    ShowIcons { playing: bool },
}

/// Observable state of one video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VideoWatch {
    pub in_view: bool,
    pub playing: bool,
    /// Play attempts in the current visibility episode
    pub attempts: u32,
    pub generation: u32,
    pub retry_pending: bool,
}

#[derive(Debug, Clone, Default)]
pub struct VideoController {
    policy: RetryPolicy,
    videos: Vec<VideoWatch>,
    shut_down: bool,
}

impl VideoController {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            videos: Vec::new(),
            shut_down: false,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn len(&self) -> usize {
        self.videos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn watch(&self, id: VideoId) -> Option<&VideoWatch> {
        self.videos.get(id)
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    /// Start tracking a video. A video already near the viewport gets one
    /// immediate play attempt, before the observer reports anything.
    pub fn register(&mut self, near_viewport: bool) -> (VideoId, Vec<VideoCommand>) {
        let id = self.videos.len();
        let mut watch = VideoWatch {
            in_view: near_viewport,
            ..VideoWatch::default()
        };
        let mut commands = vec![VideoCommand::Prepare];

        if near_viewport && !self.shut_down {
            watch.attempts = 1;
            commands.push(VideoCommand::Play {
                generation: watch.generation,
            });
        }

        self.videos.push(watch);
        (id, commands)
    }

    /// Intersection change reported by the observer
    pub fn on_visibility(&mut self, id: VideoId, intersecting: bool) -> Vec<VideoCommand> {
        if self.shut_down {
            return Vec::new();
        }
        let Some(watch) = self.videos.get_mut(id) else {
            return Vec::new();
        };

        let mut commands = Vec::new();
        if intersecting {
            watch.in_view = true;
            if watch.playing {
                return commands;
            }
            watch.generation = watch.generation.wrapping_add(1);
            if watch.retry_pending {
                watch.retry_pending = false;
                commands.push(VideoCommand::CancelRetry);
            }
            watch.attempts = 1;
            commands.push(VideoCommand::Play {
                generation: watch.generation,
            });
        } else {
            watch.in_view = false;
            watch.generation = watch.generation.wrapping_add(1);
            if watch.retry_pending {
                watch.retry_pending = false;
                commands.push(VideoCommand::CancelRetry);
            }
            commands.push(VideoCommand::Pause);
            if watch.playing {
                watch.playing = false;
                commands.push(VideoCommand::ShowIcons { playing: false });
            }
        }
        commands
    }

    /// Outcome of a `Play`/`Restart` issued under `generation`
    pub fn on_play_settled(
        &mut self,
        id: VideoId,
        generation: u32,
        outcome: Result<(), FxError>,
    ) -> Vec<VideoCommand> {
        if self.shut_down {
            return Vec::new();
        }
        let policy = self.policy;
        let Some(watch) = self.videos.get_mut(id) else {
            return Vec::new();
        };

        match outcome {
            Ok(()) => {
                if !watch.in_view {
                    // Left the viewport while play() was pending
                    watch.playing = false;
                    return vec![VideoCommand::Pause];
                }
                let mut commands = Vec::new();
                if watch.retry_pending {
                    watch.retry_pending = false;
                    commands.push(VideoCommand::CancelRetry);
                }
                watch.playing = true;
                watch.attempts = 0;
                commands.push(VideoCommand::ShowIcons { playing: true });
                commands
            }
            Err(_) => {
                if !watch.in_view || generation != watch.generation {
                    return Vec::new();
                }
                watch.playing = false;
                if watch.retry_pending || !policy.allows_retry(watch.attempts) {
                    return Vec::new();
                }
                watch.retry_pending = true;
                vec![VideoCommand::ScheduleRetry {
                    delay_ms: policy.delay_ms,
                    generation,
                }]
            }
        }
    }

    /// A retry timer scheduled under `generation` fired
    pub fn on_retry_due(&mut self, id: VideoId, generation: u32) -> Vec<VideoCommand> {
        if self.shut_down {
            return Vec::new();
        }
        let Some(watch) = self.videos.get_mut(id) else {
            return Vec::new();
        };
        if generation != watch.generation {
            return Vec::new();
        }

        watch.retry_pending = false;
        if !watch.in_view || watch.playing {
            return Vec::new();
        }
        watch.attempts = watch.attempts.saturating_add(1);
        vec![VideoCommand::Play { generation }]
    }

    /// The video reached its end: loop it from the start
    pub fn on_ended(&mut self, id: VideoId) -> Vec<VideoCommand> {
        if self.shut_down {
            return Vec::new();
        }
        let Some(watch) = self.videos.get_mut(id) else {
            return Vec::new();
        };

        watch.playing = false;
        watch.attempts = 1;
        vec![VideoCommand::Restart {
            generation: watch.generation,
        }]
    }

    /// Stop reacting to anything. Returns the retry timers to cancel.
    pub fn shutdown(&mut self) -> Vec<(VideoId, VideoCommand)> {
        self.shut_down = true;
        let mut commands = Vec::new();
        for (id, watch) in self.videos.iter_mut().enumerate() {
            watch.generation = watch.generation.wrapping_add(1);
            if watch.retry_pending {
                watch.retry_pending = false;
                commands.push((id, VideoCommand::CancelRetry));
            }
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected() -> Result<(), FxError> {
        Err(FxError::PlaybackRejected("NotAllowedError".into()))
    }

    fn policy(max_attempts: Option<u32>) -> RetryPolicy {
        RetryPolicy {
            delay_ms: 50,
            max_attempts,
        }
    }

    /// Drives the controller like the browser would: play attempts settle
    /// through a scripted outcome list, retry timers fire on a fake clock.
    struct Harness {
        ctl: VideoController,
        now: u32,
        /// (due, id, generation)
        timers: Vec<(u32, VideoId, u32)>,
        /// (time, id, generation)
        plays: Vec<(u32, VideoId, u32)>,
        pauses: Vec<(u32, VideoId)>,
        icons: Vec<bool>,
    }

    impl Harness {
        fn new(policy: RetryPolicy) -> Self {
            Self {
                ctl: VideoController::new(policy),
                now: 0,
                timers: Vec::new(),
                plays: Vec::new(),
                pauses: Vec::new(),
                icons: Vec::new(),
            }
        }

        fn apply(&mut self, id: VideoId, commands: Vec<VideoCommand>) {
            for command in commands {
                match command {
                    VideoCommand::Play { generation } | VideoCommand::Restart { generation } => {
                        self.plays.push((self.now, id, generation))
                    }
                    VideoCommand::Pause => self.pauses.push((self.now, id)),
                    VideoCommand::ScheduleRetry {
                        delay_ms,
                        generation,
                    } => self.timers.push((self.now + delay_ms, id, generation)),
                    VideoCommand::CancelRetry => self.timers.retain(|t| t.1 != id),
                    VideoCommand::ShowIcons { playing } => self.icons.push(playing),
                    VideoCommand::Prepare => {}
                }
            }
        }

        /// Settle the most recent play attempt
        fn settle_last(&mut self, outcome: Result<(), FxError>) {
            let (_, id, generation) = *self.plays.last().unwrap();
            let commands = self.ctl.on_play_settled(id, generation, outcome);
            self.apply(id, commands);
        }

        fn advance(&mut self, ms: u32) {
            self.now += ms;
            let due: Vec<_> = self.timers.iter().copied().filter(|t| t.0 <= self.now).collect();
            self.timers.retain(|t| t.0 > self.now);
            for (_, id, generation) in due {
                let commands = self.ctl.on_retry_due(id, generation);
                self.apply(id, commands);
            }
        }

        fn visibility(&mut self, id: VideoId, intersecting: bool) {
            let commands = self.ctl.on_visibility(id, intersecting);
            self.apply(id, commands);
        }
    }

    #[test]
    fn test_register_prepares_and_plays_once_when_visible() {
        let mut ctl = VideoController::new(RetryPolicy::default());
        let (id, commands) = ctl.register(true);
        assert_eq!(id, 0);
        let plays = commands
            .iter()
            .filter(|c| matches!(c, VideoCommand::Play { .. }))
            .count();
        assert_eq!(commands[0], VideoCommand::Prepare);
        assert_eq!(plays, 1);
    }

    #[test]
    fn test_register_offscreen_only_prepares() {
        let mut ctl = VideoController::new(RetryPolicy::default());
        let (_, commands) = ctl.register(false);
        assert_eq!(commands, vec![VideoCommand::Prepare]);
        assert!(!ctl.watch(0).unwrap().in_view);
    }

    #[test]
    fn test_enter_view_plays_and_shows_icons() {
        let mut h = Harness::new(policy(None));
        let (id, commands) = h.ctl.register(false);
        h.apply(id, commands);

        h.visibility(id, true);
        assert_eq!(h.plays.len(), 1);
        h.settle_last(Ok(()));
        assert!(h.ctl.watch(id).unwrap().playing);
        assert_eq!(h.icons, vec![true]);

        // Already playing: repeated intersection is a no-op
        h.visibility(id, true);
        assert_eq!(h.plays.len(), 1);
    }

    #[test]
    fn test_rejection_retries_after_backoff() {
        let mut h = Harness::new(policy(None));
        let (id, commands) = h.ctl.register(false);
        h.apply(id, commands);
        h.visibility(id, true);
        h.settle_last(rejected());

        assert_eq!(h.timers.len(), 1);
        h.advance(49);
        assert_eq!(h.plays.len(), 1);
        h.advance(1);
        assert_eq!(h.plays.len(), 2);

        let gap = h.plays[1].0 - h.plays[0].0;
        assert!((50..=100).contains(&gap));

        h.settle_last(Ok(()));
        assert!(h.ctl.watch(id).unwrap().playing);
        assert!(h.timers.is_empty());
    }

    #[test]
    fn test_leaving_view_mid_retry_wins() {
        let mut h = Harness::new(policy(None));
        let (id, commands) = h.ctl.register(false);
        h.apply(id, commands);
        h.visibility(id, true);
        h.settle_last(rejected());
        assert_eq!(h.timers.len(), 1);

        h.visibility(id, false);
        assert_eq!(h.pauses.len(), 1);
        assert!(h.timers.is_empty());

        // Even a timer that slipped past cancellation is ignored
        let stale = h.ctl.on_retry_due(id, 1);
        assert!(stale.is_empty());

        h.advance(500);
        assert_eq!(h.plays.len(), 1);
        assert!(!h.ctl.watch(id).unwrap().playing);
    }

    #[test]
    fn test_late_success_after_leaving_view_pauses() {
        let mut h = Harness::new(policy(None));
        let (id, commands) = h.ctl.register(false);
        h.apply(id, commands);
        h.visibility(id, true);
        h.visibility(id, false);
        let pauses_before = h.pauses.len();

        h.settle_last(Ok(()));
        assert_eq!(h.pauses.len(), pauses_before + 1);
        assert!(!h.ctl.watch(id).unwrap().playing);
    }

    #[test]
    fn test_stale_rejection_is_dropped() {
        let mut ctl = VideoController::new(policy(None));
        let (id, _) = ctl.register(false);
        ctl.on_visibility(id, true); // generation 1
        ctl.on_visibility(id, false); // generation 2
        ctl.on_visibility(id, true); // generation 3
        assert!(ctl.on_play_settled(id, 1, rejected()).is_empty());
        assert_eq!(
            ctl.on_play_settled(id, 3, rejected()),
            vec![VideoCommand::ScheduleRetry {
                delay_ms: 50,
                generation: 3
            }]
        );
    }

    #[test]
    fn test_retry_budget_is_bounded_and_resets_on_reentry() {
        let mut h = Harness::new(policy(Some(3)));
        let (id, commands) = h.ctl.register(false);
        h.apply(id, commands);
        h.visibility(id, true);

        for _ in 0..5 {
            h.settle_last(rejected());
            h.advance(50);
        }
        assert_eq!(h.plays.len(), 3);
        assert!(h.timers.is_empty());

        h.visibility(id, false);
        h.visibility(id, true);
        assert_eq!(h.plays.len(), 4);
        assert_eq!(h.ctl.watch(id).unwrap().attempts, 1);
    }

    #[test]
    fn test_ended_restarts() {
        let mut h = Harness::new(policy(None));
        let (id, commands) = h.ctl.register(true);
        h.apply(id, commands);
        h.settle_last(Ok(()));

        let commands = h.ctl.on_ended(id);
        assert!(matches!(commands[..], [VideoCommand::Restart { .. }]));
        h.apply(id, commands);
        h.settle_last(Ok(()));
        assert!(h.ctl.watch(id).unwrap().playing);
    }

    #[test]
    fn test_shutdown_cancels_and_silences() {
        let mut h = Harness::new(policy(None));
        let (id, commands) = h.ctl.register(true);
        h.apply(id, commands);
        h.settle_last(rejected());
        assert!(h.ctl.watch(id).unwrap().retry_pending);

        let cancels = h.ctl.shutdown();
        assert_eq!(cancels, vec![(id, VideoCommand::CancelRetry)]);
        assert!(h.ctl.on_visibility(id, true).is_empty());
        assert!(h.ctl.on_ended(id).is_empty());
        assert!(h.ctl.on_retry_due(id, 0).is_empty());
    }

    #[test]
    fn test_play_settling_after_shutdown_is_ignored() {
        let mut h = Harness::new(policy(None));
        let (id, commands) = h.ctl.register(true);
        h.apply(id, commands);
        h.ctl.shutdown();

        // play() was still pending when the effects were torn down
        assert!(h.ctl.on_play_settled(id, 0, Ok(())).is_empty());
        assert!(h.ctl.on_play_settled(id, 0, rejected()).is_empty());
        assert!(!h.ctl.watch(id).unwrap().playing);
        assert!(h.icons.is_empty());
    }

    #[test]
    fn test_playing_video_leaving_view_pauses_and_resets_icons() {
        let mut h = Harness::new(policy(None));
        let (id, commands) = h.ctl.register(false);
        h.apply(id, commands);
        h.visibility(id, true);
        h.settle_last(Ok(()));
        assert!(h.ctl.watch(id).unwrap().playing);

        h.visibility(id, false);
        assert_eq!(h.pauses.len(), 1);
        assert_eq!(h.icons, vec![true, false]);
        assert!(!h.ctl.watch(id).unwrap().playing);
        assert!(!h.ctl.watch(id).unwrap().in_view);
    }

    #[test]
    fn test_unbounded_retry_count_saturates() {
        let mut h = Harness::new(policy(None));
        let (id, commands) = h.ctl.register(false);
        h.apply(id, commands);
        h.visibility(id, true);
        h.settle_last(rejected());
        h.ctl.videos[id].attempts = u32::MAX;

        h.advance(50);
        assert_eq!(h.plays.len(), 2);
        assert_eq!(h.ctl.watch(id).unwrap().attempts, u32::MAX);
    }

    #[test]
    fn test_unknown_id_is_ignored() {
        let mut ctl = VideoController::new(RetryPolicy::default());
        assert!(ctl.on_visibility(7, true).is_empty());
        assert!(ctl.on_ended(7).is_empty());
    }
}
