//! 客户端 IP 解析
//!
//! 限流按客户端 IP 计数。部署在 CDN / 反向代理之后时真实 IP 由
//! 代理写入请求头（默认 `CF-Connecting-IP`），只有在未配置
//! trusted_proxies 或连接来自可信代理时才采信该请求头。

use std::net::{IpAddr, SocketAddr};

use actix_web::http::header::HeaderMap;
use tracing::debug;

use crate::config::RateLimitConfig;

/// 无法确定客户端时使用的占位地址
pub const UNKNOWN_CLIENT_IP: &str = "0.0.0.0";

/// 检查 IP 是否在可信代理列表中
pub fn is_trusted_proxy(ip: &str, trusted_proxies: &[String]) -> bool {
    // 先尝试解析为 SocketAddr（支持 ip:port），如果失败再尝试纯 IpAddr
    let ip_addr = if let Ok(socket_addr) = ip.parse::<SocketAddr>() {
        socket_addr.ip()
    } else if let Ok(ip_addr) = ip.parse::<IpAddr>() {
        ip_addr
    } else {
        return false;
    };

    trusted_proxies.iter().any(|proxy| {
        if proxy.contains('/') {
            ip_in_cidr(&ip_addr, proxy)
        } else {
            proxy.parse::<IpAddr>().is_ok_and(|p| p == ip_addr)
        }
    })
}

/// CIDR 检查
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };

    let Ok(prefix_len): Result<u8, _> = prefix_len.parse() else {
        return false;
    };

    let Ok(network_addr) = network.parse::<IpAddr>() else {
        return false;
    };

    match (ip, network_addr) {
        (IpAddr::V4(ip), IpAddr::V4(net)) => {
            if prefix_len > 32 {
                return false;
            }
            let mask = u32::MAX.checked_shl(32 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u32::from_be_bytes(ip.octets());
            let net_bits = u32::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        (IpAddr::V6(ip), IpAddr::V6(net)) => {
            if prefix_len > 128 {
                return false;
            }
            let mask = u128::MAX.checked_shl(128 - prefix_len as u32).unwrap_or(0);
            let ip_bits = u128::from_be_bytes(ip.octets());
            let net_bits = u128::from_be_bytes(net.octets());
            (ip_bits & mask) == (net_bits & mask)
        }
        _ => false, // IPv4 vs IPv6 不匹配
    }
}

/// 从请求头读取客户端 IP；逗号分隔时取第一个，非法 IP 视为缺失
pub fn ip_from_header(headers: &HeaderMap, header_name: &str) -> Option<String> {
    headers
        .get(header_name)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .and_then(|s| s.parse::<IpAddr>().ok())
        .map(|ip| ip.to_string())
}

/// 限流使用的客户端标识解析器
#[derive(Debug, Clone, Default)]
pub struct ClientIpResolver {
    header: Option<String>,
    trusted_proxies: Vec<String>,
}

impl ClientIpResolver {
    pub fn new(header: Option<String>, trusted_proxies: Vec<String>) -> Self {
        Self {
            header: header.filter(|h| !h.trim().is_empty()),
            trusted_proxies,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.client_ip_header.clone(),
            config.trusted_proxies.clone(),
        )
    }

    /// 解析顺序：可信的客户端 IP 请求头 → 连接地址 → `0.0.0.0`
    pub fn resolve(&self, headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
        let peer_ip = peer.map(|addr| addr.ip().to_string());

        if let Some(header) = &self.header {
            let header_trusted = self.trusted_proxies.is_empty()
                || peer_ip
                    .as_deref()
                    .is_some_and(|ip| is_trusted_proxy(ip, &self.trusted_proxies));

            if header_trusted {
                if let Some(ip) = ip_from_header(headers, header) {
                    return ip;
                }
            } else {
                debug!(
                    "Peer {:?} is not a trusted proxy, ignoring {}",
                    peer_ip, header
                );
            }
        }

        peer_ip.unwrap_or_else(|| UNKNOWN_CLIENT_IP.to_string())
    }
}
