//! Gamification: XP rewards, levels, streaks and achievements.
//!
//! The backend owns the authoritative numbers; these are the same formulas, reimplemented as
//! pure functions so views can predict rewards and render progress without a round-trip.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::task::Priority;

/// XP awarded for completing any task, before bonuses
pub const BASE_XP: u32 = 10;
/// XP per streak day
pub const STREAK_XP_MULTIPLIER: u32 = 5;
/// The streak bonus never exceeds this
pub const MAX_STREAK_BONUS: u32 = 50;

/// The priority bonus added on top of [`BASE_XP`]
pub fn priority_bonus(priority: Priority) -> u32 {
    match priority {
        Priority::Low => 5,
        Priority::Medium => 10,
        Priority::High => 20,
    }
}

/// The XP reward for completing a task at a given streak
pub fn xp_reward(priority: Priority, current_streak: u32) -> u32 {
    let streak_bonus = (current_streak * STREAK_XP_MULTIPLIER).min(MAX_STREAK_BONUS);
    BASE_XP + priority_bonus(priority) + streak_bonus
}

/// Level = 1 + floor(sqrt(total_xp / 100))
pub fn level_for_xp(total_xp: u32) -> u32 {
    1 + ((total_xp / 100) as f64).sqrt().floor() as u32
}

/// The total XP at which a level starts
pub fn level_floor_xp(level: u32) -> u32 {
    level.saturating_sub(1).pow(2) * 100
}

/// The total XP needed to reach the next level
pub fn level_ceiling_xp(level: u32) -> u32 {
    level.pow(2) * 100
}

/// Progress through the current level, in `0.0..=1.0` (the dashboard progress bar)
pub fn level_progress(total_xp: u32) -> f64 {
    let level = level_for_xp(total_xp);
    let floor = level_floor_xp(level);
    let ceiling = level_ceiling_xp(level);
    let progress = (total_xp - floor) as f64 / (ceiling - floor) as f64;
    progress.min(1.0)
}


/// A user's gamification counters, as served by `GET /gamification/stats`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(default)]
    pub total_xp: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub tasks_completed: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub last_completion_date: Option<NaiveDate>,
}

fn default_level() -> u32 {
    1
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_xp: 0,
            level: 1,
            tasks_completed: 0,
            current_streak: 0,
            longest_streak: 0,
            last_completion_date: None,
        }
    }
}

/// What a single completion earned
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionReward {
    pub xp_earned: u32,
    pub total_xp: u32,
    pub level: u32,
    pub level_up: bool,
}

impl UserStats {
    /// Advance the streak for a completion happening on `today`.
    ///
    /// First completion ever starts a streak of 1; a second completion the same day changes
    /// nothing; a completion on the next day extends the streak; any longer gap resets it.
    pub fn update_streak(&mut self, today: NaiveDate) {
        match self.last_completion_date {
            None => {
                self.current_streak = 1;
                self.longest_streak = 1;
            }
            Some(last) if last == today => {}
            Some(last) if (today - last).num_days() == 1 => {
                self.current_streak += 1;
                self.longest_streak = self.longest_streak.max(self.current_streak);
            }
            Some(_) => {
                self.current_streak = 1;
            }
        }
        self.last_completion_date = Some(today);
    }

    /// Record a task completion: advance the streak, award XP, recompute the level
    pub fn record_completion(&mut self, priority: Priority, today: NaiveDate) -> CompletionReward {
        self.update_streak(today);

        let xp_earned = xp_reward(priority, self.current_streak);
        let old_level = self.level;

        self.total_xp += xp_earned;
        self.tasks_completed += 1;
        self.level = level_for_xp(self.total_xp);

        CompletionReward {
            xp_earned,
            total_xp: self.total_xp,
            level: self.level,
            level_up: self.level > old_level,
        }
    }

    /// Apply the one-off XP bonus of a freshly unlocked achievement
    pub fn apply_achievement_bonus(&mut self, achievement: &Achievement) {
        self.total_xp += achievement.xp_reward;
        self.level = level_for_xp(self.total_xp);
    }
}


/// What it takes to unlock an achievement
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "requirement_type", content = "requirement_value", rename_all = "snake_case")]
pub enum Requirement {
    TasksCount(u32),
    Streak(u32),
    Level(u32),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    pub name: String,
    /// The one-off XP bonus awarded when this achievement unlocks
    #[serde(default)]
    pub xp_reward: u32,
    #[serde(flatten)]
    pub requirement: Requirement,
}

impl Requirement {
    fn met_by(&self, stats: &UserStats) -> bool {
        match self {
            Requirement::TasksCount(n) => stats.tasks_completed >= *n,
            Requirement::Streak(n) => stats.current_streak >= *n,
            Requirement::Level(n) => stats.level >= *n,
        }
    }
}

/// The achievements these stats unlock for the first time.
/// `already_unlocked` holds the names of achievements the user owns.
pub fn newly_unlocked<'a>(
    stats: &UserStats,
    all: &'a [Achievement],
    already_unlocked: &HashSet<String>,
) -> Vec<&'a Achievement> {
    all.iter()
        .filter(|a| !already_unlocked.contains(&a.name))
        .filter(|a| a.requirement.met_by(stats))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn xp_rewards() {
        assert_eq!(xp_reward(Priority::Low, 0), 15);
        assert_eq!(xp_reward(Priority::Medium, 1), 25);
        assert_eq!(xp_reward(Priority::High, 3), 45);
        // streak bonus caps at 50
        assert_eq!(xp_reward(Priority::High, 100), BASE_XP + 20 + MAX_STREAK_BONUS);
    }

    #[test]
    fn levels() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        assert_eq!(level_for_xp(399), 2);
        assert_eq!(level_for_xp(400), 3);
        assert_eq!(level_floor_xp(3), 400);
        assert_eq!(level_ceiling_xp(3), 900);
    }

    #[test]
    fn level_progress_stays_in_unit_range() {
        assert_eq!(level_progress(0), 0.0);
        assert!((level_progress(50) - 0.5).abs() < 1e-9);
        assert!(level_progress(899) < 1.0);
        for xp in (0..5000).step_by(37) {
            let p = level_progress(xp);
            assert!((0.0..=1.0).contains(&p), "progress {} out of range for {} XP", p, xp);
        }
    }

    #[test]
    fn streak_lifecycle() {
        let mut stats = UserStats::default();

        stats.update_streak(day("2024-03-01"));
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 1);

        // same day: unchanged
        stats.update_streak(day("2024-03-01"));
        assert_eq!(stats.current_streak, 1);

        // consecutive day: extended
        stats.update_streak(day("2024-03-02"));
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.longest_streak, 2);

        // gap: reset, longest retained
        stats.update_streak(day("2024-03-10"));
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.longest_streak, 2);
    }

    #[test]
    fn completion_awards_xp_and_levels_up() {
        let mut stats = UserStats { level: 1, ..UserStats::default() };

        let reward = stats.record_completion(Priority::High, day("2024-03-01"));
        // 10 base + 20 high + 5 streak-of-one
        assert_eq!(reward.xp_earned, 35);
        assert_eq!(stats.tasks_completed, 1);
        assert!(!reward.level_up);

        stats.total_xp = 95;
        let reward = stats.record_completion(Priority::Low, day("2024-03-02"));
        assert!(reward.level_up);
        assert_eq!(reward.level, 2);
    }

    #[test]
    fn achievements_unlock_once() {
        let all = vec![
            Achievement { name: "First steps".into(), xp_reward: 10, requirement: Requirement::TasksCount(1) },
            Achievement { name: "On fire".into(), xp_reward: 75, requirement: Requirement::Streak(7) },
        ];
        let mut owned = HashSet::new();

        let stats = UserStats { tasks_completed: 3, current_streak: 2, ..UserStats::default() };
        let fresh = newly_unlocked(&stats, &all, &owned);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].name, "First steps");

        owned.insert("First steps".to_string());
        assert!(newly_unlocked(&stats, &all, &owned).is_empty());
    }

    #[test]
    fn level_achievements_parse_and_unlock() {
        // the backend's record shape, extra display fields included
        let achievement: Achievement = serde_json::from_str(r#"{
            "name": "Level 5 Champion",
            "description": "Reach Level 5",
            "badge_icon": "X",
            "requirement_type": "level",
            "requirement_value": 5,
            "xp_reward": 50
        }"#).unwrap();
        assert_eq!(achievement.requirement, Requirement::Level(5));
        assert_eq!(achievement.xp_reward, 50);

        let all = vec![achievement];
        let owned = HashSet::new();
        let stats = UserStats { level: 4, ..UserStats::default() };
        assert!(newly_unlocked(&stats, &all, &owned).is_empty());

        let stats = UserStats { level: 5, ..UserStats::default() };
        assert_eq!(newly_unlocked(&stats, &all, &owned).len(), 1);
    }

    #[test]
    fn achievement_bonus_can_itself_level_up() {
        let achievement = Achievement {
            name: "Task Master".into(),
            xp_reward: 100,
            requirement: Requirement::TasksCount(100),
        };
        let mut stats = UserStats { total_xp: 95, level: 1, ..UserStats::default() };
        stats.apply_achievement_bonus(&achievement);
        assert_eq!(stats.total_xp, 195);
        assert_eq!(stats.level, 2);
    }

    #[test]
    fn level_floor_is_total() {
        assert_eq!(level_floor_xp(1), 0);
        assert_eq!(level_floor_xp(0), 0);
    }
}
