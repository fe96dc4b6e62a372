//! Fixed task table and startup.
//!
//! Tasks are registered with [`Scheduler::create_task`] before anything runs,
//! then [`Scheduler::start`] hands each one to a [`Launcher`] in descending
//! priority order and gives the launcher control of the core. Nothing is ever
//! added or removed after that.
//!
//! The launcher is the seam to the real executor. The firmware maps every
//! priority level onto its own embassy interrupt executor, so a runnable task
//! at a higher level always preempts a lower one, while tasks sharing a level
//! interleave at their `.await` points in wake order.
//!
//! # Failure
//!
//! [`Scheduler::start`] only returns when something stopped the tasks from
//! being launched. The returned [`SchedulerError`] is fatal: the firmware
//! reacts with the fail-stop blink and never retries.

use heapless::Vec;

use crate::config::tasks::{HEARTBEAT_PRIORITY, MINIMAL_STACK_SIZE, WORKER_PRIORITY};

/// Task priority. Higher values preempt lower ones.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub struct Priority(pub u8);

/// A registered task: metadata plus whatever the launcher needs to start it.
pub struct Task<E> {
    pub name: &'static str,
    pub priority: Priority,
    /// Declared stack budget in bytes.
    pub stack_size: usize,
    pub entry: E,
}

/// Why the task set could not be started.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum SchedulerError {
    /// More tasks than the table has room for.
    TableFull { name: &'static str },
    /// Two tasks with the same name.
    DuplicateName { name: &'static str },
    /// Stack budget below [`MINIMAL_STACK_SIZE`].
    StackTooSmall { name: &'static str, stack_size: usize },
    /// `start` called with nothing registered.
    NoTasks,
    /// The launcher has no executor for this priority level.
    UnsupportedPriority { name: &'static str, priority: Priority },
    /// The executor refused the task (pool exhausted).
    SpawnFailed { name: &'static str },
}

/// Executor backend that actually runs tasks.
pub trait Launcher<E> {
    /// Start one task. Called once per task, highest priority first.
    fn launch(
        &mut self,
        task: Task<E>,
    ) -> Result<(), SchedulerError>;

    /// Hand the core over to the executors. Never returns.
    fn run(&mut self) -> !;
}

/// Interrupt executor a priority level runs on.
///
/// `High` must sit at a more urgent NVIC priority than `Low`, so anything on
/// it preempts the worker tasks.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(target_arch = "arm", derive(defmt::Format))]
pub enum ExecutorLevel {
    High,
    Low,
}

impl ExecutorLevel {
    /// Executor for `priority`, `None` when no executor serves that level.
    pub const fn for_priority(priority: Priority) -> Option<Self> {
        match priority {
            HEARTBEAT_PRIORITY => Some(Self::High),
            WORKER_PRIORITY => Some(Self::Low),
            _ => None,
        }
    }
}

/// Static table of up to `N` tasks.
pub struct Scheduler<E, const N: usize> {
    /// Kept sorted by descending priority, registration order within a level.
    tasks: Vec<Task<E>, N>,
}

impl<E, const N: usize> Scheduler<E, N> {
    pub const fn new() -> Self { Self { tasks: Vec::new() } }

    /// Register a task. Only possible before [`start`](Self::start), which
    /// consumes the scheduler.
    pub fn create_task(
        &mut self,
        entry: E,
        name: &'static str,
        priority: Priority,
        stack_size: usize,
    ) -> Result<(), SchedulerError> {
        if stack_size < MINIMAL_STACK_SIZE {
            return Err(SchedulerError::StackTooSmall { name, stack_size });
        }
        if self.tasks.iter().any(|task| task.name == name) {
            return Err(SchedulerError::DuplicateName { name });
        }

        // Insert after every task of equal or higher priority
        let index = self.tasks.iter().take_while(|task| task.priority >= priority).count();
        let task = Task {
            name,
            priority,
            stack_size,
            entry,
        };
        self.tasks
            .insert(index, task)
            .map_err(|_| SchedulerError::TableFull { name })?;

        debug!("registered task {} (priority {})", name, priority.0);
        Ok(())
    }

    /// Number of registered tasks.
    #[inline]
    pub fn len(&self) -> usize { self.tasks.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.tasks.is_empty() }

    /// Registered tasks in launch order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task<E>> { self.tasks.iter() }

    /// Launch every task and give control to the launcher.
    ///
    /// Never returns under normal operation. A returned error means the task
    /// set is incomplete and the caller must fail stop.
    pub fn start<L: Launcher<E>>(
        self,
        launcher: &mut L,
    ) -> SchedulerError {
        if self.tasks.is_empty() {
            return SchedulerError::NoTasks;
        }

        for task in self.tasks {
            let name = task.name;
            info!(
                "starting task {} (priority {}, stack {} B)",
                name, task.priority.0, task.stack_size
            );
            if let Err(e) = launcher.launch(task) {
                error!("task {} failed to start", name);
                return e;
            }
        }

        launcher.run()
    }
}

impl<E, const N: usize> Default for Scheduler<E, N> {
    fn default() -> Self { Self::new() }
}

// =============================================================================
// Unit Tests
// =============================================================================
