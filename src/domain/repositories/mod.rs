// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 仓库接口定义了数据持久化的抽象契约，具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 法院仓库（court_repository）：主体注册表的查找与创建
/// - 任务仓库（job_repository）：提取任务的入队、获取与状态维护
/// - 调度仓库（schedule_repository）：每日重复条目的维护
/// - 运行日志仓库（run_log_repository）：审计记录的生命周期
/// - 听证仓库（hearing_repository）：听证记录的自然键幂等写入与查询
/// - 上传状态仓库（hall_status_repository）：状态记录的自然键幂等写入与查询
///
/// 这些接口确保了领域层不依赖于具体的数据存储技术，
/// 提高了系统的可测试性和可维护性.
pub mod court_repository;
pub mod hall_status_repository;
pub mod hearing_repository;
pub mod job_repository;
pub mod run_log_repository;
pub mod schedule_repository;
