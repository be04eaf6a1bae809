//! Conversion between the caller-facing project/task records and the
//! domain model, plus the top-level `solve_day` orchestration (§6).

use std::collections::{BTreeMap, HashMap};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::day_packer::{self, PackedItem};
use crate::domain::{Goal, Task, ValidationError};
use crate::mdp::Mdp;
use crate::reward_scaling::RewardScaler;
use crate::solvers::{self, SolveError, SolverKind};
use crate::todo_list::ToDoList;

/// A caller-supplied task, as received from outside the core (§6: "Input
/// projects").
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectTask {
    pub id: String,
    pub nm: String,
    pub est: u32,
    pub completed: bool,
    pub deadline: Option<u32>,
    pub today: Option<bool>,
}

/// A caller-supplied goal: a single deadline/value pair plus its tasks.
/// Unlike the domain [`Goal`], which carries a full deadline→reward
/// schedule, the external record names exactly one deadline — it's
/// expanded into a one-entry schedule at conversion time.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectGoal {
    pub id: String,
    pub nm: String,
    pub deadline: u32,
    pub value: f64,
    pub ch: Vec<ProjectTask>,
}

/// A scaled pseudo-reward as shown to the caller: either a plain number or
/// a points-per-hour string (§6: "a number... or a string with suffix
/// `/h`").
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum RewardDisplay {
    Number(f64),
    PerHour(String),
}

/// One entry of the output today-list (§6).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TodayItem {
    pub id: String,
    pub nm: String,
    /// Last-modified timestamp, milliseconds; passed through from the
    /// caller's record unchanged (this crate never stamps its own clock).
    pub lm: i64,
    pub parent_id: String,
    /// Opaque passthrough field the source record carries but the core
    /// MDP never interprets.
    pub pcp: Option<String>,
    pub est: u32,
    pub val: RewardDisplay,
}

/// Converts caller-supplied projects into a [`ToDoList`], validating every
/// task and goal (§7).
///
/// The domain [`Task`] carries a single `description` field, which this
/// conversion populates with the external task's stable `id` rather than
/// its display `nm` — pinning a today-task works by exact description
/// match (§4.5), and `id` is what a caller actually has on hand to pin
/// with. Display names are recovered from the original `ProjectTask` list
/// in [`solve_day`].
///
/// A project goal with no incomplete tasks remaining is dropped rather
/// than rejected — it contributes nothing to the MDP's state space.
/// External goals have no penalty field; conversion assumes a neutral
/// `0.0` penalty, since the external record names only a deadline and a
/// reward.
pub fn build_todo_list(projects: &[ProjectGoal], start_time: u32) -> Result<ToDoList, ValidationError> {
    let mut goals = Vec::new();

    for project in projects {
        if project.ch.iter().all(|t| t.completed) {
            continue;
        }

        let mut tasks = Vec::with_capacity(project.ch.len());
        for pt in &project.ch {
            if let Some(task_deadline) = pt.deadline {
                if task_deadline > project.deadline {
                    return Err(ValidationError::TaskDeadlineAfterGoalDeadline {
                        task: pt.nm.clone(),
                        task_deadline: task_deadline as i64,
                        goal_deadline: project.deadline as i64,
                    });
                }
            }
            tasks.push(Task::new(pt.id.clone(), pt.est, 1.0, pt.completed)?);
        }

        let rewards: BTreeMap<u32, f64> = [(project.deadline, project.value)].into_iter().collect();
        goals.push(Goal::new(
            project.nm.clone(),
            project.id.clone(),
            tasks,
            rewards,
            0.0,
            start_time,
        )?);
    }

    Ok(ToDoList::new(goals, start_time, Vec::new()))
}

/// Builds an `id -> (display name, goal id)` lookup used to translate
/// flattened-index results back into caller-facing records.
fn index_projects(projects: &[ProjectGoal]) -> HashMap<&str, (&str, &str)> {
    let mut map = HashMap::new();
    for project in projects {
        for task in &project.ch {
            map.insert(task.id.as_str(), (task.nm.as_str(), project.id.as_str()));
        }
    }
    map
}

fn display_value(raw: f64, time_est: u32, config: &SolverConfig) -> RewardDisplay {
    let rounded = RewardScaler::round_to(raw, config.round_param());
    if config.points_per_hour && time_est > 0 {
        let per_hour = rounded / (time_est as f64 / 60.0);
        RewardDisplay::PerHour(format!(
            "{}/h",
            RewardScaler::round_to(per_hour, config.round_param())
        ))
    } else {
        RewardDisplay::Number(rounded)
    }
}

/// Solves a full day: builds the `ToDoList`, solves the MDP with the
/// requested solver, packs `today_tasks` into `duration` minutes, and maps
/// the result back into caller-facing [`TodayItem`] records.
pub fn solve_day(
    projects: &[ProjectGoal],
    start_time: u32,
    today_tasks: &[String],
    duration: i64,
    kind: SolverKind,
    config: &SolverConfig,
) -> Result<Vec<TodayItem>, SolveError> {
    let todo = build_todo_list(projects, start_time)?;
    let mut mdp = Mdp::new(&todo, config.gamma());
    solvers::solve(&mut mdp, kind, config)?;
    mdp.install_reward_scaling(config.reward_floor, config.reward_ceiling);

    let packed: Vec<PackedItem> = day_packer::pack_day(&mdp, today_tasks, duration, config.round_param())?;
    let lookup = index_projects(projects);

    Ok(packed
        .into_iter()
        .map(|item| {
            let task = todo.task(item.index);
            let id = task.description().to_string();
            let (nm, parent_id) = lookup
                .get(id.as_str())
                .map(|&(nm, goal_id)| (nm.to_string(), goal_id.to_string()))
                .unwrap_or_else(|| (id.clone(), String::new()));
            TodayItem {
                id,
                nm,
                lm: 0,
                parent_id,
                pcp: None,
                est: task.time_est(),
                val: display_value(item.pseudo_reward, task.time_est(), config),
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_projects() -> Vec<ProjectGoal> {
        vec![ProjectGoal {
            id: "G1".to_string(),
            nm: "Finish report".to_string(),
            deadline: 100,
            value: 100.0,
            ch: vec![ProjectTask {
                id: "t1".to_string(),
                nm: "Write draft".to_string(),
                est: 30,
                completed: false,
                deadline: None,
                today: None,
            }],
        }]
    }

    #[test]
    fn builds_a_todo_list_from_projects() {
        let todo = build_todo_list(&sample_projects(), 0).unwrap();
        assert_eq!(todo.len(), 1);
        assert_eq!(todo.task(0).description(), "t1");
    }

    #[test]
    fn rejects_task_deadline_after_goal_deadline() {
        let mut projects = sample_projects();
        projects[0].ch[0].deadline = Some(200);
        let err = build_todo_list(&projects, 0).unwrap_err();
        assert!(matches!(err, ValidationError::TaskDeadlineAfterGoalDeadline { .. }));
    }

    #[test]
    fn drops_goals_whose_tasks_are_all_completed() {
        let mut projects = sample_projects();
        projects[0].ch[0].completed = true;
        let todo = build_todo_list(&projects, 0).unwrap();
        assert!(todo.is_empty());
    }

    #[test]
    fn solve_day_produces_a_today_list() {
        let projects = sample_projects();
        let config = SolverConfig::default();
        let items = solve_day(&projects, 0, &[], 60, SolverKind::BackwardInduction, &config).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].nm, "Write draft");
        assert_eq!(items[0].parent_id, "G1");
    }

    #[test]
    fn points_per_hour_display_has_suffix() {
        let projects = sample_projects();
        let mut config = SolverConfig::default();
        config.points_per_hour = true;
        let items = solve_day(&projects, 0, &[], 60, SolverKind::BackwardInduction, &config).unwrap();
        assert!(matches!(items[0].val, RewardDisplay::PerHour(ref s) if s.ends_with("/h")));
    }
}
