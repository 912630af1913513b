// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 法院（court）：任务与产出记录关联的站点主体
/// - 提取任务（job）：队列中的一次提取请求
/// - 运行日志（run_log）：每次执行的审计记录
/// - 听证记录（hearing）：律师检索提取的规范化产出
/// - 上传状态（hall_status）：实时状态提取的规范化产出
pub mod court;
pub mod hall_status;
pub mod hearing;
pub mod job;
pub mod run_log;
