/*!
 * Ready Queues
 * Single FIFO, or three feedback levels with strict Q1 > Q2 > Q3 precedence
 */

use crate::process::{FeedbackLevel, Process};
use std::collections::VecDeque;

#[derive(Debug)]
pub(crate) enum ReadyQueues {
    Single(VecDeque<Process>),
    Levels([VecDeque<Process>; 3]),
}

impl ReadyQueues {
    pub fn new(feedback: bool) -> Self {
        if feedback {
            Self::Levels([VecDeque::new(), VecDeque::new(), VecDeque::new()])
        } else {
            Self::Single(VecDeque::new())
        }
    }

    /// Queues in precedence order
    #[inline]
    pub fn levels(&self) -> &[VecDeque<Process>] {
        match self {
            Self::Single(queue) => std::slice::from_ref(queue),
            Self::Levels(levels) => levels,
        }
    }

    #[inline]
    fn levels_mut(&mut self) -> &mut [VecDeque<Process>] {
        match self {
            Self::Single(queue) => std::slice::from_mut(queue),
            Self::Levels(levels) => levels,
        }
    }

    /// Append at the tail of the process's level (or the single queue)
    pub fn push_back(&mut self, process: Process) {
        match self {
            Self::Single(queue) => queue.push_back(process),
            Self::Levels(levels) => levels[process.level().index()].push_back(process),
        }
    }

    /// Put back at the head of its queue
    pub fn push_front(&mut self, process: Process) {
        match self {
            Self::Single(queue) => queue.push_front(process),
            Self::Levels(levels) => levels[process.level().index()].push_front(process),
        }
    }

    /// Head of the highest non-empty level
    pub fn pop_front(&mut self) -> Option<Process> {
        self.levels_mut().iter_mut().find_map(VecDeque::pop_front)
    }

    pub fn front(&self) -> Option<&Process> {
        self.iter().next()
    }

    /// Flattened iteration in precedence order
    pub fn iter(&self) -> impl Iterator<Item = &Process> {
        self.levels().iter().flat_map(VecDeque::iter)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Process> {
        self.levels_mut().iter_mut().flat_map(VecDeque::iter_mut)
    }

    /// Remove by flattened position (as yielded by `iter`)
    pub fn remove(&mut self, mut index: usize) -> Option<Process> {
        for queue in self.levels_mut() {
            if index < queue.len() {
                return queue.remove(index);
            }
            index -= queue.len();
        }
        None
    }

    pub fn len(&self) -> usize {
        self.levels().iter().map(VecDeque::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels().iter().all(VecDeque::is_empty)
    }

    /// Length of one feedback level; zero for levels a single queue lacks
    pub fn level_len(&self, level: FeedbackLevel) -> usize {
        match self {
            Self::Single(queue) if level == FeedbackLevel::Q1 => queue.len(),
            Self::Single(_) => 0,
            Self::Levels(levels) => levels[level.index()].len(),
        }
    }

    pub fn is_feedback(&self) -> bool {
        matches!(self, Self::Levels(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessSpec;

    fn at_level(pid: u32, level: FeedbackLevel) -> Process {
        let mut p = Process::new(pid, pid, &ProcessSpec::new(format!("P{pid}"), 5));
        p.set_level(level);
        p
    }

    #[test]
    fn test_levels_pop_in_precedence_order() {
        let mut ready = ReadyQueues::new(true);
        ready.push_back(at_level(1, FeedbackLevel::Q3));
        ready.push_back(at_level(2, FeedbackLevel::Q2));
        ready.push_back(at_level(3, FeedbackLevel::Q1));
        ready.push_back(at_level(4, FeedbackLevel::Q2));

        let order: Vec<u32> = std::iter::from_fn(|| ready.pop_front()).map(|p| p.pid()).collect();
        assert_eq!(order, vec![3, 2, 4, 1]);
    }

    #[test]
    fn test_flattened_remove() {
        let mut ready = ReadyQueues::new(true);
        ready.push_back(at_level(1, FeedbackLevel::Q1));
        ready.push_back(at_level(2, FeedbackLevel::Q2));
        ready.push_back(at_level(3, FeedbackLevel::Q3));

        assert_eq!(ready.remove(1).map(|p| p.pid()), Some(2));
        assert_eq!(ready.remove(5), None);
        assert_eq!(ready.len(), 2);
        assert_eq!(ready.level_len(FeedbackLevel::Q2), 0);
    }

    #[test]
    fn test_single_queue_ignores_levels() {
        let mut ready = ReadyQueues::new(false);
        ready.push_back(at_level(1, FeedbackLevel::Q3));
        ready.push_back(at_level(2, FeedbackLevel::Q1));
        assert_eq!(ready.front().map(|p| p.pid()), Some(1));
        assert_eq!(ready.level_len(FeedbackLevel::Q1), 2);
        assert!(!ready.is_feedback());
    }
}
