//! Structural checks on a plan's dependency graph
//!
//! Nothing here rejects a plan; the pipeline logs the issues and returns the
//! plan as the model produced it.

use std::collections::{HashMap, HashSet};
use std::fmt;

use tracing::debug;

use super::{Plan, Task};

/// A structural problem in a plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanIssue {
    /// Two or more tasks share an id
    DuplicateId(u32),
    /// A task lists itself as a dependency
    SelfDependency(u32),
    /// A task depends on an id that is not in the plan
    UnknownDependency { task: u32, dependency: u32 },
    /// Dependencies form a cycle; path starts and ends on the same id
    Cycle(Vec<u32>),
}

impl fmt::Display for PlanIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanIssue::DuplicateId(id) => write!(f, "duplicate task id {}", id),
            PlanIssue::SelfDependency(id) => write!(f, "task {} depends on itself", id),
            PlanIssue::UnknownDependency { task, dependency } => {
                write!(f, "task {} depends on unknown task {}", task, dependency)
            }
            PlanIssue::Cycle(path) => {
                let path: Vec<String> = path.iter().map(|id| id.to_string()).collect();
                write!(f, "dependency cycle {}", path.join(" -> "))
            }
        }
    }
}

/// Find every structural issue in a plan, in task order
pub fn check_dependencies(plan: &Plan) -> Vec<PlanIssue> {
    debug!(task_count = plan.len(), "check_dependencies: called");
    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for task in plan.tasks() {
        if !seen.insert(task.id) && reported.insert(task.id) {
            issues.push(PlanIssue::DuplicateId(task.id));
        }
    }

    for task in plan.tasks() {
        for &dep in &task.dependencies {
            if dep == task.id {
                issues.push(PlanIssue::SelfDependency(task.id));
            } else if !seen.contains(&dep) {
                issues.push(PlanIssue::UnknownDependency {
                    task: task.id,
                    dependency: dep,
                });
            }
        }
    }

    if let Some(cycle) = find_cycle(plan.tasks()) {
        issues.push(PlanIssue::Cycle(cycle));
    }

    debug!(issue_count = issues.len(), "check_dependencies: complete");
    issues
}

/// Detect a dependency cycle with DFS, visiting tasks in plan order
///
/// Self-dependencies are reported separately and skipped here.
fn find_cycle(tasks: &[Task]) -> Option<Vec<u32>> {
    let graph: HashMap<u32, &Task> = tasks.iter().map(|t| (t.id, t)).collect();
    let mut visited = HashSet::new();

    for task in tasks {
        if visited.contains(&task.id) {
            continue;
        }
        if let Some(cycle) = cycle_from(task.id, &graph, &mut visited) {
            debug!(?cycle, "find_cycle: cycle detected");
            return Some(cycle);
        }
    }
    None
}

/// Walk the dependencies reachable from `start` with an explicit stack
///
/// Each frame is a task id and the index of its next dependency to visit.
/// The frames on the stack are the current path, so plan length never
/// bounds call depth.
fn cycle_from(start: u32, graph: &HashMap<u32, &Task>, visited: &mut HashSet<u32>) -> Option<Vec<u32>> {
    let mut stack: Vec<(u32, usize)> = vec![(start, 0)];
    let mut on_path = HashSet::from([start]);
    visited.insert(start);

    while let Some(frame) = stack.last_mut() {
        let (node, next) = *frame;
        frame.1 += 1;

        let dep = match graph.get(&node).and_then(|t| t.dependencies.get(next)) {
            Some(&dep) => dep,
            None => {
                on_path.remove(&node);
                stack.pop();
                continue;
            }
        };

        if dep == node || !graph.contains_key(&dep) {
            continue;
        }
        if on_path.contains(&dep) {
            // Trim the path to the cycle itself
            let begin = stack.iter().position(|&(id, _)| id == dep).unwrap_or(0);
            let mut cycle: Vec<u32> = stack[begin..].iter().map(|&(id, _)| id).collect();
            cycle.push(dep);
            return Some(cycle);
        }
        if visited.insert(dep) {
            on_path.insert(dep);
            stack.push((dep, 0));
        }
    }
    None
}
