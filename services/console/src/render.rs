//! Text frames for the terminal
//!
//! One frame per tick: status line, load bar, controls, the last login
//! message and the newest log lines.

use simulation::engine::SimulationSnapshot;
use simulation::metrics::SimMetrics;
use std::fmt::Write;

const BAR_WIDTH: usize = 30;

/// Load bar scaled to capacity; overload past 100% is drawn with `!`.
pub fn load_bar(load: u32, capacity: u32) -> String {
    if capacity == 0 {
        return format!("[{}]", " ".repeat(BAR_WIDTH));
    }
    let ratio = load as f64 / capacity as f64;
    let filled = ((ratio.min(1.0)) * BAR_WIDTH as f64).round() as usize;
    let fill_char = if ratio > 1.0 { '!' } else { '#' };
    let mut bar = String::with_capacity(BAR_WIDTH + 2);
    bar.push('[');
    bar.extend(std::iter::repeat(fill_char).take(filled));
    bar.extend(std::iter::repeat(' ').take(BAR_WIDTH - filled));
    bar.push(']');
    bar
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

/// Render one snapshot.
pub fn frame(snapshot: &SimulationSnapshot, log_lines: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "── tick {:>4} ── {} ──",
        snapshot.tick, snapshot.status
    );
    let _ = writeln!(
        out,
        "Load {:>4}/{:<4} {} {:>4.0}%",
        snapshot.load,
        snapshot.capacity,
        load_bar(snapshot.load, snapshot.capacity),
        snapshot.load_ratio * 100.0,
    );
    let attacker = if snapshot.attacker_blocked {
        "BLOCKED".to_string()
    } else if snapshot.attack_running {
        format!("{} x{}", snapshot.attack_type, snapshot.num_bots)
    } else {
        "idle".to_string()
    };
    let _ = writeln!(
        out,
        "Attacker: {} | Rate limiting: {} | Auto-scaling: {}",
        attacker,
        on_off(snapshot.rate_limiting_enabled),
        on_off(snapshot.auto_scaling_enabled),
    );
    if let Some(message) = &snapshot.user_message {
        let _ = writeln!(out, "User: {}", message);
    }
    for entry in snapshot.logs.iter().take(log_lines) {
        let _ = writeln!(out, "  {}", entry);
    }
    out
}

/// Closing report printed when the loop ends.
pub fn summary(metrics: &SimMetrics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", metrics.summary());
    let _ = writeln!(
        out,
        "Login success rate: {:.0}% | Rate limiter stopped {:.0}% of attack volume",
        metrics.login_success_rate() * 100.0,
        metrics.mitigation_rate() * 100.0,
    );
    for bucket in &metrics.status_buckets {
        let _ = writeln!(out, "  {:<12} {:>6} ticks", bucket.status.label(), bucket.ticks);
    }
    out
}
