//! Reminder selection and CRC notice composition

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::models::{CrcReminder, DayMonthDue, StaffMember};
use crate::time::is_day_month_due_or_overdue;
use crate::types::StaffRole;

/// Role value meaning nobody was assigned
pub const UNASSIGNED: &str = "Chưa chọn";

/// Items whose recurring date has arrived this year
pub fn due_reminders<'a, R: DayMonthDue>(items: &'a [R], today: NaiveDate) -> Vec<&'a R> {
    items
        .iter()
        .filter(|item| is_day_month_due_or_overdue(item.day_month(), today))
        .collect()
}

fn assigned(role: &Option<String>) -> Option<&str> {
    role.as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != UNASSIGNED)
}

/// Approval reminder mail for one CRC
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrcNotice {
    pub reminder_id: String,
    /// Assigned staff names, approver first
    pub participants: Vec<String>,
    pub recipients: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl CrcNotice {
    /// Build the mail for `reminder`.
    ///
    /// Fails with [`CoreError::ReminderNotDue`] before the execution date and
    /// with [`CoreError::NoRecipients`] when no assigned role resolves to a
    /// staff mailbox. Each role is looked up in its own directory only.
    pub fn compose(
        reminder: &CrcReminder,
        staff: &[StaffMember],
        email_suffix: &str,
        today: NaiveDate,
    ) -> CoreResult<Self> {
        if !is_day_month_due_or_overdue(&reminder.ngay_thuc_hien, today) {
            return Err(CoreError::ReminderNotDue {
                id: reminder.id.clone(),
            });
        }

        let roles = [
            (StaffRole::Ldpcrc, &reminder.ldpcrc),
            (StaffRole::Cbcrc, &reminder.cbcrc),
            (StaffRole::Quycrc, &reminder.quycrc),
        ];
        let assignments: Vec<(StaffRole, &str)> = roles
            .into_iter()
            .filter_map(|(role, name)| assigned(name).map(|name| (role, name)))
            .collect();

        let participants: Vec<String> =
            assignments.iter().map(|(_, name)| name.to_string()).collect();

        let recipients: Vec<String> = assignments
            .iter()
            .filter_map(|(role, name)| {
                staff
                    .iter()
                    .find(|member| member.role == *role && member.ten_nv == *name)
            })
            .filter_map(|member| member.email.as_deref())
            .filter(|prefix| !prefix.is_empty())
            .map(|prefix| format!("{}{}", prefix, email_suffix))
            .collect();

        if recipients.is_empty() {
            log::warn!("CRC reminder {} has no resolvable recipient", reminder.id);
            return Err(CoreError::NoRecipients {
                id: reminder.id.clone(),
            });
        }

        let greeting = if participants.is_empty() {
            "Xin chào, ".to_string()
        } else {
            let names: Vec<String> = participants.iter().map(|name| format!("bạn {}", name)).collect();
            format!("Xin chào {}, ", names.join(", "))
        };
        let day = &reminder.ngay_thuc_hien;
        let body = format!(
            "{}Có yêu cầu duyệt CRC loại {} cần thực hiện vào ngày {}, các bạn hãy hoàn thành duyệt CRC trước 14 giờ 00 ngày {}. Trân trọng cám ơn.",
            greeting, reminder.loai_bt_crc, day, day
        );

        Ok(Self {
            reminder_id: reminder.id.clone(),
            participants,
            recipients,
            subject: format!("Nhắc nhở duyệt CRC: {}", reminder.loai_bt_crc),
            body,
        })
    }
}
