//! Display strings for the two supported languages.

#[derive(Debug, PartialEq, Eq)]
pub struct LanguageTexts {
    /// BCP 47 tag used for the `lang` attribute of the reminder document.
    pub tag: &'static str,
    pub sit_reminder_title: &'static str,
    pub sit_reminder_message: &'static str,
    pub sit_reminder_button: &'static str,
    pub drink_reminder_title: &'static str,
    pub drink_reminder_message: &'static str,
    pub drink_reminder_button: &'static str,
    pub confirm_message: &'static str,
    pub reset_message: &'static str,
    pub status_title: &'static str,
    pub sit_status: &'static str,
    pub drink_status: &'static str,
    pub disabled: &'static str,
    pub minutes_later: &'static str,
    /// Placed between the number of minutes and [LanguageTexts::minutes_later].
    pub minutes_separator: &'static str,
    pub coming_soon: &'static str,
    pub wait_seconds: &'static str,
    pub seconds_suffix: &'static str,
    pub modal_heading: &'static str,
    pub blocking_hint: &'static str,
    /// Shown in the terminal once the reminder can be confirmed.
    pub confirm_hint: &'static str,
    pub font_stack: &'static str,
}

impl LanguageTexts {
    pub fn minutes_until(&self, minutes: i64) -> String {
        format!("{minutes}{}{}", self.minutes_separator, self.minutes_later)
    }
}

pub static ZH_CN: LanguageTexts = LanguageTexts {
    tag: "zh-CN",
    sit_reminder_title: "🚶‍♂️ 该起身活动了！",
    sit_reminder_message: "长时间坐着对健康不利，起来伸展一下身体，活动活动筋骨吧！",
    sit_reminder_button: "我已经起身活动了",
    drink_reminder_title: "💧 该喝水了！",
    drink_reminder_message: "保持身体水分充足很重要，现在就喝一杯水吧！",
    drink_reminder_button: "我已经喝水了",
    confirm_message: "提醒已确认，计时器已重置",
    reset_message: "所有计时器已重置",
    status_title: "📊 健康提醒状态",
    sit_status: "🚶‍♂️ 久坐提醒",
    drink_status: "💧 喝水提醒",
    disabled: "已禁用",
    minutes_later: "分钟后提醒",
    minutes_separator: "",
    coming_soon: "即将提醒",
    wait_seconds: "请等待",
    seconds_suffix: "秒...",
    modal_heading: "健康提醒",
    blocking_hint: "健康提醒中，请先处理提醒",
    confirm_hint: "按回车键确认",
    font_stack: r#"-apple-system, BlinkMacSystemFont, "Segoe UI", "PingFang SC", "Hiragino Sans GB", "Microsoft YaHei", sans-serif"#,
};

pub static EN: LanguageTexts = LanguageTexts {
    tag: "en",
    sit_reminder_title: "🚶‍♂️ Time to Stand Up!",
    sit_reminder_message:
        "Sitting for long periods is bad for your health. Get up, stretch your body, and move around!",
    sit_reminder_button: "I have stood up and moved",
    drink_reminder_title: "💧 Time to Drink Water!",
    drink_reminder_message:
        "Staying hydrated is important for your health. Drink a glass of water now!",
    drink_reminder_button: "I have drunk water",
    confirm_message: "Reminder confirmed, timer has been reset",
    reset_message: "All timers have been reset",
    status_title: "📊 Health Reminder Status",
    sit_status: "🚶‍♂️ Sit Reminder",
    drink_status: "💧 Drink Reminder",
    disabled: "Disabled",
    minutes_later: "minutes until reminder",
    minutes_separator: " ",
    coming_soon: "Coming soon",
    wait_seconds: "Please wait",
    seconds_suffix: "seconds...",
    modal_heading: "Health Reminder",
    blocking_hint: "Health reminder active, please handle it first",
    confirm_hint: "Press Enter to confirm",
    font_stack: r#"-apple-system, BlinkMacSystemFont, "Segoe UI", "Roboto", "Helvetica Neue", Arial, sans-serif"#,
};

/// Bundle for a language code. Unknown codes get the Chinese bundle, which is also the default
/// language.
pub fn texts_for(language: &str) -> &'static LanguageTexts {
    match language {
        "en" => &EN,
        _ => &ZH_CN,
    }
}
