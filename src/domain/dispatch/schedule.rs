//! Dispatch schedules: the sequencer's output, as plain data.

use std::time::Duration;

use super::send_command::SendCommand;

/// Commands of one send unit and when to fire them, relative to dispatch time.
///
/// Commands inside one entry are sent in order; separate entries fire
/// independently of each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledSend {
    pub delay: Duration,
    pub commands: Vec<SendCommand>,
}

impl ScheduledSend {
    pub fn new(delay: Duration, commands: Vec<SendCommand>) -> Self {
        Self { delay, commands }
    }

    pub fn immediate(command: SendCommand) -> Self {
        Self::new(Duration::ZERO, vec![command])
    }
}

/// An ordered list of scheduled sends for one turn.
///
/// Lead commands go out in order before any timed send is started.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchSchedule {
    lead: Vec<SendCommand>,
    sends: Vec<ScheduledSend>,
}

impl DispatchSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, send: ScheduledSend) {
        self.sends.push(send);
    }

    /// Queues a command that is sent before every timed send.
    pub fn send_first(&mut self, command: SendCommand) {
        self.lead.push(command);
    }

    pub fn lead(&self) -> &[SendCommand] {
        &self.lead
    }

    /// Removes and returns the lead commands.
    pub fn take_lead(&mut self) -> Vec<SendCommand> {
        std::mem::take(&mut self.lead)
    }

    /// Appends another schedule, keeping both delay bases.
    pub fn extend(&mut self, other: DispatchSchedule) {
        self.lead.extend(other.lead);
        self.sends.extend(other.sends);
    }

    pub fn sends(&self) -> &[ScheduledSend] {
        &self.sends
    }

    pub fn len(&self) -> usize {
        self.sends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sends.is_empty()
    }

    /// Total number of Send API calls this schedule will make.
    pub fn command_count(&self) -> usize {
        self.lead.len() + self.sends.iter().map(|s| s.commands.len()).sum::<usize>()
    }

    /// All commands in schedule order, lead first, flattened.
    pub fn commands(&self) -> impl Iterator<Item = &SendCommand> {
        self.lead
            .iter()
            .chain(self.sends.iter().flat_map(|s| s.commands.iter()))
    }
}

impl IntoIterator for DispatchSchedule {
    type Item = ScheduledSend;
    type IntoIter = std::vec::IntoIter<ScheduledSend>;

    fn into_iter(self) -> Self::IntoIter {
        self.sends.into_iter()
    }
}

impl FromIterator<ScheduledSend> for DispatchSchedule {
    fn from_iter<T: IntoIterator<Item = ScheduledSend>>(iter: T) -> Self {
        Self {
            lead: Vec::new(),
            sends: iter.into_iter().collect(),
        }
    }
}
