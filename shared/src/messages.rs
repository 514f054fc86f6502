//! Localized strings shown by the widget.

pub const SIGN_IN_LABEL: &str = "登录";
pub const SIGN_IN_BUSY_LABEL: &str = "登录中...";
pub const SIGN_UP_LABEL: &str = "注册";
pub const SIGN_UP_BUSY_LABEL: &str = "注册中...";
pub const SIGN_OUT_LABEL: &str = "退出";

pub const SEND_LABEL: &str = "发送";
pub const SEND_BUSY_LABEL: &str = "发送中...";
pub const QUESTION_PLACEHOLDER: &str = "输入你的问题...";

pub const PENDING_TEXT: &str = "正在生成...";
pub const BOT_AVATAR: &str = "AI";
pub const GUEST_LABEL: &str = "Guest";

/// Shown when the answer endpoint replied with neither an answer nor an error.
pub const REQUEST_FAILED: &str = "请求失败";
/// Shown when the answer endpoint could not be reached or its body was unreadable.
pub const REQUEST_ERROR: &str = "请求错误";

pub const FILL_IN_CREDENTIALS: &str = "请填写邮箱和密码";
pub const SIGN_IN_NOT_CONFIGURED: &str =
    "登录服务未配置，请检查服务器环境变量或使用 ?guest=1 游客模式";
pub const SIGN_UP_NOT_CONFIGURED: &str =
    "注册服务未配置，请检查服务器环境变量或使用 ?guest=1 游客模式";
