//! Seeded synthetic sessions for demos, tests and benchmarks.
//!
//! Human sessions wander with drifting velocity, jitter and occasional pauses.
//! Bot sessions follow one mechanical pattern at a fixed sampling interval.

use crate::session::{Point, Session, SessionKind, SessionMetadata};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Map, Value};

/// Base timestamp for generated sessions (ms).
const EPOCH_MS: i64 = 1_700_000_000_000;

const HUMAN_HOUR_WEIGHTS: [u32; 24] = [
    1, 1, 1, 1, 1, 2, 3, 5, 8, 10, 12, 15, 15, 15, 12, 10, 8, 12, 15, 18, 15, 10, 5, 2,
];
const BOT_HOUR_WEIGHTS: [u32; 24] = [
    8, 10, 12, 10, 8, 5, 3, 2, 3, 5, 7, 8, 8, 8, 8, 8, 8, 8, 10, 8, 8, 8, 10, 10,
];

const HUMAN_RESOLUTIONS: &[&str] = &["1920x1080", "1366x768", "1440x900", "1536x864", "1280x720"];
const BOT_RESOLUTIONS: &[&str] = &["1920x1080", "1366x768", "1024x768"];
const HUMAN_DEVICES: &[&str] = &["Desktop", "Laptop", "Tablet", "Mobile"];
const BOT_DEVICES: &[&str] = &["Desktop", "Virtual Machine"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotPattern {
    Linear,
    Curve,
    Step,
    Zigzag,
}

impl BotPattern {
    pub const ALL: [BotPattern; 4] = [
        BotPattern::Linear,
        BotPattern::Curve,
        BotPattern::Step,
        BotPattern::Zigzag,
    ];
}

pub struct SessionGenerator {
    rng: ChaCha8Rng,
}

impl SessionGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// `humans` + `bots` sessions in shuffled order.
    pub fn corpus(&mut self, humans: usize, bots: usize) -> Vec<Session> {
        let mut sessions: Vec<Session> = (1..=humans).map(|i| self.human(i)).collect();
        sessions.extend((1..=bots).map(|i| self.bot(i)));
        sessions.shuffle(&mut self.rng);
        sessions
    }

    pub fn human(&mut self, index: usize) -> Session {
        let rng = &mut self.rng;
        let mut x = rng.gen_range(50..=300) as f64;
        let mut y = rng.gen_range(50..=300) as f64;
        let start = EPOCH_MS + rng.gen_range(-10_000..=10_000);
        let n = rng.gen_range(80..=200);
        let mut vx: f64 = rng.gen_range(-2.0..2.0);
        let mut vy: f64 = rng.gen_range(-2.0..2.0);

        let mut t = start;
        let mut movements = Vec::with_capacity(n);
        for _ in 0..n {
            if rng.gen_bool(0.15) {
                vx += rng.gen_range(-1.0..1.0_f64);
                vy += rng.gen_range(-1.0..1.0_f64);
            }
            x = (x + vx + rng.gen_range(-0.5..0.5_f64)).clamp(0.0, 800.0);
            y = (y + vy + rng.gen_range(-0.5..0.5_f64)).clamp(0.0, 600.0);
            t += if rng.gen_bool(0.1) {
                rng.gen_range(200..=800)
            } else {
                rng.gen_range(8..=50)
            };
            movements.push(Point::new(x.round(), y.round(), t));
        }

        let duration = (t - start) as f64 / 1000.0;
        self.session(format!("human_{:03}", index), SessionKind::Human, movements, duration)
    }

    pub fn bot(&mut self, index: usize) -> Session {
        let pattern = BotPattern::ALL[self.rng.gen_range(0..BotPattern::ALL.len())];
        self.bot_with(index, pattern)
    }

    pub fn bot_with(&mut self, index: usize, pattern: BotPattern) -> Session {
        let rng = &mut self.rng;
        let (x0, y0) = (rng.gen_range(100..=200) as f64, rng.gen_range(100..=200) as f64);
        let start = EPOCH_MS + rng.gen_range(-10_000..=10_000);
        let n: usize = rng.gen_range(30..=80);
        let interval: i64 = rng.gen_range(50..=150);
        let at = |i: usize| start + i as i64 * interval;

        let movements: Vec<Point> = match pattern {
            BotPattern::Linear => {
                let (ex, ey) = (rng.gen_range(300..=600) as f64, rng.gen_range(300..=500) as f64);
                (0..n)
                    .map(|i| {
                        let p = i as f64 / (n - 1) as f64;
                        Point::new((x0 + (ex - x0) * p).trunc(), (y0 + (ey - y0) * p).trunc(), at(i))
                    })
                    .collect()
            }
            BotPattern::Curve => {
                let (cx, cy) = (rng.gen_range(200..=400) as f64, rng.gen_range(200..=400) as f64);
                let (ex, ey) = (rng.gen_range(400..=600) as f64, rng.gen_range(300..=500) as f64);
                (0..n)
                    .map(|i| {
                        let s = i as f64 / (n - 1) as f64;
                        let bx = (1.0 - s).powi(2) * x0 + 2.0 * (1.0 - s) * s * cx + s * s * ex;
                        let by = (1.0 - s).powi(2) * y0 + 2.0 * (1.0 - s) * s * cy + s * s * ey;
                        Point::new(bx.trunc(), by.trunc(), at(i))
                    })
                    .collect()
            }
            BotPattern::Step => {
                let steps = [20.0, -20.0, 0.0];
                let (mut x, mut y) = (x0, y0);
                (0..n)
                    .map(|i| {
                        if i % 10 == 0 {
                            x += steps[rng.gen_range(0..steps.len())];
                            y += steps[rng.gen_range(0..steps.len())];
                        }
                        Point::new(x, y, at(i))
                    })
                    .collect()
            }
            BotPattern::Zigzag => {
                let amplitude = rng.gen_range(20..=50) as f64;
                let frequency: f64 = rng.gen_range(0.1..0.3);
                (0..n)
                    .map(|i| {
                        let offset = amplitude * (i as f64 * frequency).sin();
                        Point::new((x0 + i as f64 * 5.0).trunc(), (y0 + offset).trunc(), at(i))
                    })
                    .collect()
            }
        };

        let duration = movements
            .last()
            .map(|p| (p.t - start) as f64 / 1000.0)
            .unwrap_or(0.5);
        self.session(format!("bot_{:03}", index), SessionKind::Bot, movements, duration)
    }

    fn session(&mut self, id: String, kind: SessionKind, movements: Vec<Point>, duration: f64) -> Session {
        let metadata = self.metadata(kind, duration);
        Session {
            session_id: id,
            kind,
            metadata,
            movements,
            extra: Map::new(),
        }
    }

    fn metadata(&mut self, kind: SessionKind, duration: f64) -> SessionMetadata {
        let rng = &mut self.rng;
        let weights = match kind {
            SessionKind::Human => &HUMAN_HOUR_WEIGHTS,
            SessionKind::Bot => &BOT_HOUR_WEIGHTS,
        };
        let hour = match WeightedIndex::new(weights.iter().copied()) {
            Ok(dist) => dist.sample(rng),
            Err(_) => 12,
        };
        let (minute, second) = (rng.gen_range(0..60), rng.gen_range(0..60));

        let (resolutions, devices, entropy): (&[&str], &[&str], f64) = match kind {
            SessionKind::Human => (HUMAN_RESOLUTIONS, HUMAN_DEVICES, rng.gen_range(2.0..8.0)),
            SessionKind::Bot => (BOT_RESOLUTIONS, BOT_DEVICES, rng.gen_range(1.0..3.0)),
        };

        let mut extra = Map::new();
        let mut put = |k: &str, v: Value| {
            extra.insert(k.to_string(), v);
        };
        put("time_of_day", json!(format!("{:02}:{:02}:{:02}", hour, minute, second)));
        put("browser", json!(pick(rng, &["Chrome", "Firefox", "Safari", "Edge"])));
        put(
            "os",
            json!(pick(rng, &["Windows 10", "Windows 11", "macOS", "Linux", "Android", "iOS"])),
        );
        put("screen_resolution", json!(pick(rng, resolutions)));
        put("device_type", json!(pick(rng, devices)));
        put(
            "ip_region",
            json!(pick(rng, &["US-East", "US-West", "EU-West", "Asia-Pacific"])),
        );
        put("user_agent_entropy", json!((entropy * 100.0).round() / 100.0));

        SessionMetadata {
            session_duration: Some((duration * 1000.0).round() / 1000.0),
            extra,
        }
    }
}

fn pick<'a>(rng: &mut ChaCha8Rng, items: &[&'a str]) -> &'a str {
    items[rng.gen_range(0..items.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::extract;

    #[test]
    fn corpus_is_seeded_and_labeled() {
        let a = SessionGenerator::new(5).corpus(10, 12);
        let b = SessionGenerator::new(5).corpus(10, 12);
        assert_eq!(a, b);
        assert_eq!(a.iter().filter(|s| s.kind == SessionKind::Bot).count(), 12);
        assert!(a.iter().any(|s| s.session_id == "human_010"));
        assert!(a.iter().any(|s| s.session_id == "bot_012"));
    }

    #[test]
    fn every_pattern_extracts() {
        let mut gen = SessionGenerator::new(11);
        for (i, pattern) in BotPattern::ALL.into_iter().enumerate() {
            let s = gen.bot_with(i + 1, pattern);
            assert!((30..=80).contains(&s.movements.len()));
            let fv = extract(&s.movements, s.duration_hint()).unwrap();
            assert_eq!(fv.num_points, s.movements.len());
        }
        let h = gen.human(1);
        assert!((80..=200).contains(&h.movements.len()));
        assert!(h.movements.windows(2).all(|w| w[1].t > w[0].t));
        assert!(h.metadata.extra.contains_key("browser"));
    }
}
