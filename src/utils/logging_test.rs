#[cfg(test)]
mod tests {
    use super::super::logging::init_logging;

    #[test]
    fn test_logging_initialization() {
        // 全局 subscriber 每个进程只能安装一次，
        // 测试二进制里只有这里调用 init_logging
        init_logging();

        // 初始化后发日志不会 panic（RUST_LOG 未设置时走默认过滤器）
        tracing::debug!(component = "logging", "volukey logging smoke event");
        tracing::warn!("volukey logging smoke warning");
    }
}
