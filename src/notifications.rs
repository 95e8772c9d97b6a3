use notify_rust::Notification;

const SUMMARY: &str = "休息时间到了";
const BODY: &str = "离开屏幕，起来活动一下吧";

pub fn notify_rest_started() {
    let result = Notification::new()
        .summary(SUMMARY)
        .body(BODY)
        .timeout(5000)
        .show();

    if let Err(e) = result {
        tracing::warn!(event = "reminder.notification.failed", error = %e);
    }
}
