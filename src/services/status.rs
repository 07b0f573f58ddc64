/// 状态文本的接收方（界面上的状态栏），只管发送不关心结果
pub trait StatusReporter: Send {
    fn report_status(&mut self, text: &str);
}

/// 把状态写进日志；与上一条相同的状态只记 debug，避免每个 tick 刷屏
#[derive(Debug, Default)]
pub struct LogStatusReporter {
    last: Option<String>,
}

impl StatusReporter for LogStatusReporter {
    fn report_status(&mut self, text: &str) {
        if self.last.as_deref() == Some(text) {
            log::debug!("📟 {}", text);
            return;
        }
        log::info!("📟 {}", text);
        self.last = Some(text.to_string());
    }
}
