use jenxt_core::{ExecutionOutcome, ResultEnvelope};

/// 将各服务器的执行结果按目标顺序合并为响应体
///
/// 成功和失败的结果一并保留，顺序与输入一致。
pub fn aggregate(outcomes: Vec<ExecutionOutcome>) -> ResultEnvelope {
    ResultEnvelope {
        results: outcomes.into_iter().map(Into::into).collect(),
    }
}
