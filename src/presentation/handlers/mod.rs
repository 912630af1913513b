// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 请求处理器模块
///
/// 提供各类HTTP请求的处理逻辑
pub mod extract_handler;
pub mod hearing_handler;
pub mod run_log_handler;
pub mod status_handler;
