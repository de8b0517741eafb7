//! View-mode controller event loop
//!
//! All triggers funnel into this single task: user actions and status queries
//! from the HTTP surface, dwell completions posted back by the controller's
//! own timers, and reminder-due signals from the backend subscription. One
//! consumer, one state variable, no overlapping transitions.

use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{
    backend::{Backend, ReminderEvents},
    controller::{ControllerEvent, ViewModeController},
};

/// Drive the controller until the command channel closes. The reminder
/// subscription is dropped (deregistered) when the task ends.
pub async fn controller_task<B: Backend>(
    mut controller: ViewModeController<B>,
    mut events_rx: mpsc::Receiver<ControllerEvent>,
    mut reminders: ReminderEvents,
) {
    info!("Starting view-mode controller task");
    controller.arm_dwell();

    let mut reminders_open = true;
    loop {
        tokio::select! {
            event = events_rx.recv() => match event {
                Some(ControllerEvent::Action { action, reply }) => {
                    let snapshot = controller.on_action(action).await;
                    let _ = reply.send(snapshot);
                }
                Some(ControllerEvent::Query { reply }) => {
                    let _ = reply.send(controller.snapshot());
                }
                Some(ControllerEvent::ReminderDue) => {
                    controller.on_reminder_due().await;
                }
                Some(ControllerEvent::DwellElapsed { epoch }) => {
                    controller.on_dwell_elapsed(epoch).await;
                }
                None => {
                    info!("Controller channel closed, stopping view-mode loop");
                    return;
                }
            },
            maybe = reminders.recv(), if reminders_open => match maybe {
                Some(()) => {
                    controller.on_reminder_due().await;
                }
                None => {
                    warn!("Reminder event stream closed, relying on local-zero resyncs");
                    reminders_open = false;
                }
            },
        }
    }
}
