//! Resource kind tags.
//!
//! Every tracked resource carries a [`Provider`] identifying what kind of
//! asynchronous operation it represents. The set is closed and process-wide;
//! listeners receive the uppercase wire name through the init hook and can
//! map small integer tags back to kinds via [`Provider::from_tag`] without
//! access to this crate's source.

use core::fmt;

/// The kind of a tracked asynchronous resource.
///
/// `Provider::None` is a sentinel used only for bounds checks and "not a
/// resource" markers; constructing a live resource with it is a programming
/// error and aborts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Provider {
    /// Sentinel; never assigned to a live resource.
    None = 0,
    /// An accepted server connection.
    Connection,
    /// A file-system event watcher.
    FsEventWrap,
    /// A file-system request.
    FsReqWrap,
    /// A DNS address lookup request.
    GetAddrInfoReqWrap,
    /// A DNS name lookup request.
    GetNameInfoReqWrap,
    /// An HTTP protocol parser.
    HttpParser,
    /// A stream implemented on top of user callbacks.
    JsStream,
    /// A PBKDF2 key-derivation request.
    Pbkdf2Request,
    /// A pipe connect request.
    PipeConnectWrap,
    /// A named pipe or UNIX domain socket.
    PipeWrap,
    /// A child process handle.
    ProcessWrap,
    /// A generic DNS query.
    QueryWrap,
    /// A random-bytes generation request.
    RandomBytesRequest,
    /// A datagram send request.
    SendWrap,
    /// A stream shutdown request.
    ShutdownWrap,
    /// A signal handle.
    SignalWrap,
    /// A file stat watcher.
    StatWatcher,
    /// A TCP socket or server.
    TcpWrap,
    /// A TCP connect request.
    TcpConnectWrap,
    /// A timer.
    TimerWrap,
    /// A TLS stream.
    TlsWrap,
    /// A TTY handle.
    TtyWrap,
    /// A UDP socket.
    UdpWrap,
    /// A stream write request.
    WriteWrap,
    /// A compression context.
    Zctx,
}

impl Provider {
    /// Number of provider kinds, including the `None` sentinel.
    ///
    /// Valid tags are `0..COUNT`; live resources use `1..COUNT`.
    pub const COUNT: u32 = 26;

    /// Returns the small integer tag for this kind.
    #[must_use]
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// Looks a kind up by its integer tag.
    ///
    /// Returns `None` for tags outside `0..COUNT`.
    #[must_use]
    pub const fn from_tag(tag: u32) -> Option<Self> {
        Some(match tag {
            0 => Self::None,
            1 => Self::Connection,
            2 => Self::FsEventWrap,
            3 => Self::FsReqWrap,
            4 => Self::GetAddrInfoReqWrap,
            5 => Self::GetNameInfoReqWrap,
            6 => Self::HttpParser,
            7 => Self::JsStream,
            8 => Self::Pbkdf2Request,
            9 => Self::PipeConnectWrap,
            10 => Self::PipeWrap,
            11 => Self::ProcessWrap,
            12 => Self::QueryWrap,
            13 => Self::RandomBytesRequest,
            14 => Self::SendWrap,
            15 => Self::ShutdownWrap,
            16 => Self::SignalWrap,
            17 => Self::StatWatcher,
            18 => Self::TcpWrap,
            19 => Self::TcpConnectWrap,
            20 => Self::TimerWrap,
            21 => Self::TlsWrap,
            22 => Self::TtyWrap,
            23 => Self::UdpWrap,
            24 => Self::WriteWrap,
            25 => Self::Zctx,
            _ => return None,
        })
    }

    /// Returns the stable uppercase name reported to the init hook.
    ///
    /// # Panics
    ///
    /// Panics on `Provider::None`; the sentinel has no reportable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        assert!(
            self != Self::None,
            "Provider::None has no name; it is never a live resource"
        );
        match self {
            Self::None => unreachable!(),
            Self::Connection => "CONNECTION",
            Self::FsEventWrap => "FSEVENTWRAP",
            Self::FsReqWrap => "FSREQWRAP",
            Self::GetAddrInfoReqWrap => "GETADDRINFOREQWRAP",
            Self::GetNameInfoReqWrap => "GETNAMEINFOREQWRAP",
            Self::HttpParser => "HTTPPARSER",
            Self::JsStream => "JSSTREAM",
            Self::Pbkdf2Request => "PBKDF2REQUEST",
            Self::PipeConnectWrap => "PIPECONNECTWRAP",
            Self::PipeWrap => "PIPEWRAP",
            Self::ProcessWrap => "PROCESSWRAP",
            Self::QueryWrap => "QUERYWRAP",
            Self::RandomBytesRequest => "RANDOMBYTESREQUEST",
            Self::SendWrap => "SENDWRAP",
            Self::ShutdownWrap => "SHUTDOWNWRAP",
            Self::SignalWrap => "SIGNALWRAP",
            Self::StatWatcher => "STATWATCHER",
            Self::TcpWrap => "TCPWRAP",
            Self::TcpConnectWrap => "TCPCONNECTWRAP",
            Self::TimerWrap => "TIMERWRAP",
            Self::TlsWrap => "TLSWRAP",
            Self::TtyWrap => "TTYWRAP",
            Self::UdpWrap => "UDPWRAP",
            Self::WriteWrap => "WRITEWRAP",
            Self::Zctx => "ZCTX",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::None {
            f.write_str("NONE")
        } else {
            f.write_str(self.name())
        }
    }
}
