// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作者模块
///
/// 提供后台任务处理功能：从队列领取提取任务并执行
pub mod extract_worker;
pub mod manager;
