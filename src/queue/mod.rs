// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 队列模块
///
/// 提供持久化任务队列和调度功能
pub mod job_queue;
pub mod scheduler;
