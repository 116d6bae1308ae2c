#![allow(dead_code)]

use chrono::NaiveDate;
use dailylog_core::{DailyRecord, GenerationService, ServiceError, ServiceResult};
use std::cell::RefCell;
use std::collections::VecDeque;

/// Generation double that replays scripted replies and records prompts.
pub struct ScriptedGeneration {
    replies: RefCell<VecDeque<ServiceResult<String>>>,
    prompts: RefCell<Vec<String>>,
}

impl ScriptedGeneration {
    pub fn new(replies: Vec<ServiceResult<String>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    pub fn replying(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    pub fn failing(err: ServiceError) -> Self {
        Self::new(vec![Err(err)])
    }

    pub fn silent() -> Self {
        Self::new(Vec::new())
    }

    pub fn calls(&self) -> usize {
        self.prompts.borrow().len()
    }

    pub fn prompt(&self, index: usize) -> String {
        self.prompts.borrow()[index].clone()
    }
}

impl GenerationService for ScriptedGeneration {
    fn complete(&self, prompt: &str) -> ServiceResult<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Transport("no scripted reply".to_string())))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Record whose content only resolves through the raw input.
pub fn raw_record(day: NaiveDate, today: &str, tomorrow: &str) -> DailyRecord {
    DailyRecord::new(day, today, tomorrow)
}

pub fn daily_reply(today: &str, tomorrow: &str) -> String {
    format!(
        "{}\n{today}\n{}\n{tomorrow}",
        dailylog_core::MARK_TODAY,
        dailylog_core::MARK_TOMORROW
    )
}
